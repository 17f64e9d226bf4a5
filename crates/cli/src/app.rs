use std::sync::Arc;

use clap::Parser;
use clap::error::ErrorKind;

use crate::args::Cli;
use crate::logger::{CliLogger, init_tracing};
use crate::pipeline;

pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = match Cli::try_parse() {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                let _ = err.print();
                std::process::exit(0);
            }
            Err(err) => {
                println!("{}", err.render());
                std::process::exit(1);
            }
        };

        let logger = Arc::new(CliLogger::new(&cli.log_level));
        init_tracing(Arc::clone(&logger));

        Self { cli, logger }
    }

    pub async fn run(self) {
        if let Err(err) = pipeline::run(&self.cli, &self.logger).await {
            self.logger.failed(format!("{err}"));
            std::process::exit(1);
        }
    }
}
