use clap::Subcommand;
use folio_client::ContactDispatcher;
use folio_config::Config;
use folio_utils::http::HttpClient;

use crate::client;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message the way the contact form does
    #[command(aliases(["s"]))]
    Submit {
        #[arg(long, default_value = "Test User")]
        name: String,
        #[arg(long, default_value = "test@example.com")]
        email: String,
        #[arg(
            long,
            default_value = "This is a test message from the contact form. It should be at least \
                             10 characters long to pass validation."
        )]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Submit {
                name,
                email,
                message,
            } => submit(config, &name, &email, &message).await,
        }
    }
}

async fn submit(config: Config, name: &str, email: &str, message: &str) -> anyhow::Result<()> {
    let transport = client::transport(&config.client, HttpClient::default());
    let dispatcher = ContactDispatcher::new(transport);

    match dispatcher.dispatch(name, email, message).await {
        Ok(()) => {
            println!("Message sent");
            Ok(())
        }
        Err(err) => anyhow::bail!("{err}"),
    }
}
