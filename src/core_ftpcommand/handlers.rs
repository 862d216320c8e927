use crate::config::Config;
use crate::constants::MAX_VERB_IN_REPLY;
use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::parser::CommandLine;
use crate::core_ftpcommand::{
    cdup, cwd, list, mode, noop, pass, pwd, quit, retr, stru, syst, type_, user,
};
use crate::core_network::{pasv, port, ControlWriter};
use crate::helpers::send_error;
use crate::session::Session;
use log::{error, warn};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type CommandFuture = Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>;

pub type CommandHandler = Box<
    dyn Fn(
            ControlWriter,
            Arc<Config>,
            Arc<Mutex<Session>>,
            String, // argument, may be empty
        ) -> CommandFuture
        + Send
        + Sync,
>;

pub type CommandHandlers = HashMap<FtpCommand, Arc<CommandHandler>>;

fn boxed<F, Fut>(f: F) -> Arc<CommandHandler>
where
    F: Fn(ControlWriter, Arc<Config>, Arc<Mutex<Session>>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    let handler: CommandHandler = Box::new(move |writer, config, session, arg| -> CommandFuture {
        Box::pin(f(writer, config, session, arg))
    });
    Arc::new(handler)
}

pub fn initialize_command_handlers() -> CommandHandlers {
    let mut handlers: CommandHandlers = HashMap::new();

    handlers.insert(FtpCommand::USER, boxed(user::handle_user_command));
    handlers.insert(FtpCommand::PASS, boxed(pass::handle_pass_command));
    handlers.insert(FtpCommand::QUIT, boxed(quit::handle_quit_command));
    handlers.insert(FtpCommand::PWD, boxed(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::CWD, boxed(cwd::handle_cwd_command));
    handlers.insert(FtpCommand::CDUP, boxed(cdup::handle_cdup_command));
    handlers.insert(FtpCommand::LIST, boxed(list::handle_list_command));
    handlers.insert(FtpCommand::NLST, boxed(list::handle_nlst_command));
    handlers.insert(FtpCommand::RETR, boxed(retr::handle_retr_command));
    handlers.insert(FtpCommand::TYPE, boxed(type_::handle_type_command));
    handlers.insert(FtpCommand::MODE, boxed(mode::handle_mode_command));
    handlers.insert(FtpCommand::STRU, boxed(stru::handle_stru_command));
    handlers.insert(FtpCommand::SYST, boxed(syst::handle_syst_command));
    handlers.insert(FtpCommand::NOOP, boxed(noop::handle_noop_command));

    // Data channel setup
    handlers.insert(FtpCommand::PASV, boxed(pasv::handle_pasv_command));
    handlers.insert(FtpCommand::PORT, boxed(port::handle_port_command));

    handlers
}

/// The client's verb as echoed in a reply, cut to a few characters.
fn reply_verb(verb: &str) -> String {
    let mut shown: String = verb.chars().take(MAX_VERB_IN_REPLY).collect();
    if shown.len() < verb.len() {
        shown.push_str("...");
    }
    shown
}

/// Runs one parsed command line. Command failures are answered on the control
/// channel; only an I/O error on that channel itself is returned.
pub async fn dispatch(
    handlers: &CommandHandlers,
    line: CommandLine,
    writer: &ControlWriter,
    config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    let command = match line.command {
        Some(command) => command,
        None => {
            let verb = reply_verb(&line.verb);
            warn!("Unknown command: {}", verb);
            return send_error(writer, &FtpError::CommandNotImplemented(verb)).await;
        }
    };

    if command.requires_login() {
        let gate = session.lock().await.require_login();
        if let Err(e) = gate {
            warn!("{:?} rejected before login", command);
            return send_error(writer, &e).await;
        }
    }

    let handler = match handlers.get(&command) {
        Some(handler) => Arc::clone(handler),
        None => {
            error!("No handler registered for {:?}", command);
            return send_error(writer, &FtpError::CommandNotImplemented(reply_verb(&line.verb))).await;
        }
    };

    handler(
        Arc::clone(writer),
        Arc::clone(config),
        Arc::clone(session),
        line.arg,
    )
    .await
}
