use super::args::*;

pub mod init;
pub mod optimize;
pub mod techniques;

use crate::exit_codes;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Optimize(args) => optimize::run(args).await,
        Command::Techniques => Ok(techniques::run()),
        Command::Init(args) => init::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::SUCCESS)
        }
    }
}
