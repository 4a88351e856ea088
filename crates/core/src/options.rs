//! Browser acquisition options and the `WxH` viewport syntax.

use std::path::PathBuf;

use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::handler::viewport::Viewport;
use serde::{Deserialize, Serialize};

use crate::error::{CdtError, Result};

/// Chrome release channel. Resolved to the conventional executable name on
/// PATH when no explicit executable path is given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
	#[default]
	Stable,
	Beta,
	Dev,
	Canary,
}

impl Channel {
	pub fn executable_name(&self) -> &'static str {
		match self {
			Channel::Stable => "google-chrome",
			Channel::Beta => "google-chrome-beta",
			Channel::Dev => "google-chrome-unstable",
			Channel::Canary => "google-chrome-canary",
		}
	}
}

impl std::fmt::Display for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Channel::Stable => write!(f, "stable"),
			Channel::Beta => write!(f, "beta"),
			Channel::Dev => write!(f, "dev"),
			Channel::Canary => write!(f, "canary"),
		}
	}
}

/// How to reach a browser: connect to a running one over its WebSocket
/// endpoint, or launch a fresh process with the remaining options.
///
/// Once a session holds a live handle these options are ignored until the
/// session is released.
#[derive(Clone, Debug, Default)]
pub struct BrowserOptions {
	pub ws_endpoint: Option<String>,
	pub headless: bool,
	pub executable_path: Option<PathBuf>,
	pub channel: Option<Channel>,
	/// Initial window size as `WIDTHxHEIGHT`, e.g. `1280x720`.
	pub viewport: Option<String>,
	pub proxy_server: Option<String>,
	pub accept_insecure_certs: bool,
	pub chrome_args: Vec<String>,
}

impl BrowserOptions {
	pub(crate) fn launch_config(&self) -> Result<BrowserConfig> {
		let mut builder = BrowserConfig::builder();

		// chromiumoxide defaults to headless; with_head() opts out
		if !self.headless {
			builder = builder.with_head();
		}

		if let Some(spec) = self.viewport.as_deref() {
			let (width, height) = parse_viewport(spec)?;
			builder = builder.viewport(Viewport {
				width,
				height,
				device_scale_factor: None,
				emulating_mobile: false,
				is_landscape: true,
				has_touch: false,
			});
		}

		if let Some(path) = &self.executable_path {
			builder = builder.chrome_executable(path);
		} else if let Some(channel) = self.channel {
			let name = channel.executable_name();
			let resolved = which::which(name).map_err(|_| {
				CdtError::BrowserLaunch(format!("no {name} executable found for channel {channel}"))
			})?;
			builder = builder.chrome_executable(resolved);
		}

		if let Some(proxy) = &self.proxy_server {
			builder = builder.arg(format!("--proxy-server={proxy}"));
		}
		if self.accept_insecure_certs {
			builder = builder.arg("--ignore-certificate-errors");
		}
		for arg in &self.chrome_args {
			builder = builder.arg(arg);
		}

		builder.build().map_err(CdtError::BrowserLaunch)
	}
}

/// Parse a `WIDTHxHEIGHT` viewport spec. Malformed input is an error; a
/// viewport is never silently zeroed.
pub fn parse_viewport(spec: &str) -> Result<(u32, u32)> {
	let invalid = || CdtError::InvalidInput(format!("viewport must be WIDTHxHEIGHT, got '{spec}'"));
	let (width, height) = spec.split_once(['x', 'X']).ok_or_else(invalid)?;
	let width: u32 = width.trim().parse().map_err(|_| invalid())?;
	let height: u32 = height.trim().parse().map_err(|_| invalid())?;
	if width == 0 || height == 0 {
		return Err(CdtError::InvalidInput(format!(
			"viewport dimensions must be non-zero, got '{spec}'"
		)));
	}
	Ok((width, height))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_standard_viewport() {
		assert_eq!(parse_viewport("1920x1080").unwrap(), (1920, 1080));
	}

	#[test]
	fn accepts_uppercase_separator_and_whitespace() {
		assert_eq!(parse_viewport("1280X720").unwrap(), (1280, 720));
		assert_eq!(parse_viewport(" 800 x 600 ").unwrap(), (800, 600));
	}

	#[test]
	fn rejects_malformed_viewport() {
		assert!(parse_viewport("1920").is_err());
		assert!(parse_viewport("1920x").is_err());
		assert!(parse_viewport("widexhigh").is_err());
		assert!(parse_viewport("").is_err());
	}

	#[test]
	fn rejects_zero_dimensions() {
		assert!(parse_viewport("0x600").is_err());
		assert!(parse_viewport("800x0").is_err());
	}

	#[test]
	fn channel_executable_names() {
		assert_eq!(Channel::Stable.executable_name(), "google-chrome");
		assert_eq!(Channel::Dev.executable_name(), "google-chrome-unstable");
	}
}
