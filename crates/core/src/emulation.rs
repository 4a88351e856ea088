//! Device emulation and viewport overrides.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use serde::Serialize;

use crate::error::{CdtError, Result};

/// Emulation profile for a well-known device.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
	pub name: &'static str,
	pub width: u32,
	pub height: u32,
	pub device_scale_factor: f64,
	pub mobile: bool,
	pub user_agent: &'static str,
}

pub const KNOWN_DEVICES: &[Device] = &[
	Device {
		name: "iPhone SE",
		width: 375,
		height: 667,
		device_scale_factor: 2.0,
		mobile: true,
		user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
	},
	Device {
		name: "iPhone 13",
		width: 390,
		height: 844,
		device_scale_factor: 3.0,
		mobile: true,
		user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1",
	},
	Device {
		name: "iPhone 15 Pro",
		width: 393,
		height: 852,
		device_scale_factor: 3.0,
		mobile: true,
		user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
	},
	Device {
		name: "Pixel 5",
		width: 393,
		height: 851,
		device_scale_factor: 2.75,
		mobile: true,
		user_agent: "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Mobile Safari/537.36",
	},
	Device {
		name: "Pixel 7",
		width: 412,
		height: 915,
		device_scale_factor: 2.625,
		mobile: true,
		user_agent: "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Mobile Safari/537.36",
	},
	Device {
		name: "iPad Pro",
		width: 1024,
		height: 1366,
		device_scale_factor: 2.0,
		mobile: true,
		user_agent: "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
	},
];

/// Case-insensitive lookup in the known-device table.
pub fn find_device(name: &str) -> Option<&'static Device> {
	KNOWN_DEVICES.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Apply a known device's viewport metrics and user agent to the page.
pub async fn emulate_device(page: &Page, name: &str) -> Result<&'static Device> {
	let device = find_device(name).ok_or_else(|| {
		let known: Vec<&str> = KNOWN_DEVICES.iter().map(|d| d.name).collect();
		CdtError::InvalidInput(format!(
			"unknown device '{name}', known devices: {}",
			known.join(", ")
		))
	})?;

	set_device_metrics(page, device.width, device.height, device.device_scale_factor, device.mobile)
		.await?;
	let params = SetUserAgentOverrideParams::builder()
		.user_agent(device.user_agent)
		.build()
		.map_err(CdtError::Transport)?;
	page.execute(params).await?;
	Ok(device)
}

/// Resize the page viewport without touching the user agent.
pub async fn resize(page: &Page, width: u32, height: u32) -> Result<()> {
	set_device_metrics(page, width, height, 1.0, false).await
}

async fn set_device_metrics(
	page: &Page,
	width: u32,
	height: u32,
	device_scale_factor: f64,
	mobile: bool,
) -> Result<()> {
	let params = SetDeviceMetricsOverrideParams::builder()
		.width(width as i64)
		.height(height as i64)
		.device_scale_factor(device_scale_factor)
		.mobile(mobile)
		.build()
		.map_err(CdtError::Transport)?;
	page.execute(params).await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn device_lookup_is_case_insensitive() {
		assert!(find_device("pixel 5").is_some());
		assert!(find_device("IPHONE 13").is_some());
		assert!(find_device("Nokia 3310").is_none());
	}

	#[test]
	fn known_devices_have_sane_profiles() {
		for device in KNOWN_DEVICES {
			assert!(device.width > 0 && device.height > 0, "{}", device.name);
			assert!(device.device_scale_factor >= 1.0, "{}", device.name);
			assert!(!device.user_agent.is_empty(), "{}", device.name);
		}
	}
}
