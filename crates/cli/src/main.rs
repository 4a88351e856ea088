use cdt_cli::{
	cli::Cli,
	commands, error, logging,
	output::{self, OutputFormat, ResultBuilder},
};
use clap::Parser;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli, format).await {
		handle_error(err, format);
		std::process::exit(1);
	}
}

fn handle_error(err: cdt::CdtError, format: OutputFormat) {
	let cmd_error = error::to_command_error(&err);

	// Always print to stderr for humans
	output::print_error_stderr(&cmd_error);

	// Also emit the envelope to stdout with ok=false (for agents)
	if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new("unknown")
			.error(cmd_error.code, &cmd_error.message)
			.build();
		output::print_result(&result, format);
	}
}
