//! Command dispatch: translate parsed arguments into core calls and print
//! one result envelope per invocation.

mod debugging;
mod emulation;
mod input;
mod navigation;
mod network;
mod performance;

use cdt::{Result, Session};
use serde::Serialize;
use serde_json::json;

use crate::cli::{Cli, Commands};
use crate::output::{self, OutputFormat, ResultBuilder};

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let options = cli.browser_options();
	let mut session = Session::new();

	match cli.command {
		Commands::Nav(command) => navigation::execute(command, &mut session, &options, format).await,
		Commands::Input(command) => input::execute(command, &mut session, &options, format).await,
		Commands::Emulate(command) => emulation::execute(command, &mut session, &options, format).await,
		Commands::Perf(command) => performance::execute(command, &mut session, &options, format).await,
		Commands::Network(command) => network::execute(command, &mut session, &options, format).await,
		Commands::Debug(command) => debugging::execute(command, &mut session, &options, format).await,
		Commands::Close => {
			session.release().await?;
			emit(format, "close", json!({ "closed": true }));
			Ok(())
		}
	}
}

/// Print a success envelope for `command` carrying `data`.
pub(crate) fn emit<T: Serialize>(format: OutputFormat, command: &str, data: T) {
	let result = ResultBuilder::new(command).data(data).build();
	output::print_result(&result, format);
}
