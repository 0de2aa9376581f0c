use anyhow::bail;
use clap::Subcommand;
use jash_client::{ContactForm, FormState, SubmitError};
use jash_config::Config;
use jash_models::contact::ContactField;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through the contact endpoint
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                name,
                email,
                category,
                message,
            } => {
                let form = environment::contact_form(&config)?;
                form.set_field(ContactField::Name, name);
                form.set_field(ContactField::Email, email);
                form.set_field(ContactField::Category, category);
                form.set_field(ContactField::Message, message);
                send(&form).await
            }
        }
    }
}

async fn send(form: &ContactForm<impl jash_client::api::ContactApi>) -> anyhow::Result<()> {
    match form.submit().await {
        Ok(FormState::Success { message }) => {
            println!("{message}");
            Ok(())
        }
        Ok(FormState::Error { message }) => bail!("{message}"),
        Ok(state) => bail!("Unexpected form state {state:?}"),
        Err(err) => {
            if let SubmitError::Invalid(errors) = &err {
                for (field, message) in errors.iter() {
                    eprintln!("{}: {message}", field.as_str());
                }
            }
            bail!("{}", err.warning())
        }
    }
}
