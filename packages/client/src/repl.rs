//! Interactive project REPL.
//!
//! One loop multiplexes three inputs: lines read from the terminal,
//! events arriving on the room socket, and debounce timers firing for
//! locally edited paths. Plain lines are chat (the `@ai` trigger works as
//! in the browser); slash commands drive the sync engine and the run
//! sandbox.

use tokio::sync::mpsc;

use atelier_server::domain::ChatPayload;
use atelier_server::infrastructure::dto::websocket::ServerEvent;

use crate::{
    api::ApiClient,
    error::ClientError,
    sandbox::ProcessSandbox,
    saver::{DebouncedSaver, QUIET_PERIOD},
    session::WsSession,
    sync::SyncState,
};

const HELP: &str = "commands:
  /edit <path> <content>   edit a file (auto-saved after 1s of quiet)
  /cat <path>              print a file
  /files                   list files
  /run                     flush pending saves, then run the project
  /help                    this message
  /quit                    leave the room
anything else is chat; mention @ai to pull in the AI collaborator";

/// Drive the room session until the user quits or the socket closes.
pub async fn run(
    api: &ApiClient,
    mut session: WsSession,
    mut sync: SyncState,
    mut sandbox: ProcessSandbox,
    project_id: &str,
) -> Result<(), ClientError> {
    let (mut saver, mut save_rx) = DebouncedSaver::new(QUIET_PERIOD);
    let mut input_rx = spawn_input_reader();
    println!("{HELP}");

    loop {
        tokio::select! {
            event = session.next_event() => {
                match event? {
                    Some(event) => display_event(&mut sync, event),
                    None => {
                        println!("connection closed by server");
                        break;
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else { break };
                if !handle_input(api, &mut session, &mut sync, &mut saver, &mut save_rx, &mut sandbox, project_id, line.trim()).await? {
                    break;
                }
            }
            path = save_rx.recv() => {
                // the saver channel lives as long as `saver`, so recv
                // only yields Some here
                if let Some(path) = path {
                    persist_path(api, &mut session, &mut sync, &sandbox, project_id, &path).await?;
                }
            }
        }
    }

    sandbox.stop().await;
    session.close().await.ok();
    Ok(())
}

/// Read terminal lines on a blocking thread and feed them to the loop.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match rustyline::DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("failed to open terminal: {e}");
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(&line);
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                // Ctrl-C / Ctrl-D end the session
                Err(_) => break,
            }
        }
    });
    rx
}

fn display_event(sync: &mut SyncState, event: ServerEvent) {
    match event {
        ServerEvent::ProjectMessage { message, sender } => match message {
            ChatPayload::PlainText { text } => println!("[{}] {text}", sender.email),
            ChatPayload::FileDelta { path, content } => {
                match sync.apply_remote(&path, content) {
                    Ok(()) => println!("* {} updated {path}", sender.email),
                    Err(e) => eprintln!("could not apply remote edit to {path}: {e}"),
                }
            }
        },
        ServerEvent::Welcome {
            name, users, ..
        } => {
            println!("joined '{name}' (members: {})", users.join(", "));
        }
        ServerEvent::Error { message } => eprintln!("server: {message}"),
    }
}

/// Returns `false` when the user asked to quit.
async fn handle_input(
    api: &ApiClient,
    session: &mut WsSession,
    sync: &mut SyncState,
    saver: &mut DebouncedSaver,
    save_rx: &mut mpsc::UnboundedReceiver<String>,
    sandbox: &mut ProcessSandbox,
    project_id: &str,
    line: &str,
) -> Result<bool, ClientError> {
    match line {
        "" => {}
        "/quit" => return Ok(false),
        "/help" => println!("{HELP}"),
        "/files" => {
            for path in sync.tree().file_paths() {
                let marker = if sync.is_dirty(&path) { " *" } else { "" };
                println!("  {path}{marker}");
            }
            for path in sync.dirty_paths() {
                if sync.tree().read(&path).is_err() {
                    println!("  {path} * (new)");
                }
            }
        }
        "/run" => {
            // force-fire the pending debounce timers and drain what they
            // emit, so nothing dirty is left behind before executing
            saver.flush_all_pending();
            while let Ok(path) = save_rx.try_recv() {
                persist_path(api, session, sync, sandbox, project_id, &path).await?;
            }
            // paths whose earlier save failed no longer have a timer;
            // retry them here
            for path in sync.dirty_paths() {
                persist_path(api, session, sync, sandbox, project_id, &path).await?;
            }
            match sandbox.run(sync.tree()).await {
                Ok(address) => println!("preview ready at {address}"),
                Err(e) => eprintln!("run failed: {e}"),
            }
        }
        _ if line.starts_with("/cat ") => {
            let path = line["/cat ".len()..].trim();
            match sync.read(path) {
                Some(contents) => println!("{contents}"),
                None => eprintln!("no such file: {path}"),
            }
        }
        _ if line.starts_with("/edit ") => {
            let rest = line["/edit ".len()..].trim();
            match rest.split_once(' ') {
                Some((path, content)) => {
                    sync.local_edit(path, content.to_string());
                    saver.schedule(path);
                }
                None => eprintln!("usage: /edit <path> <content>"),
            }
        }
        _ if line.starts_with('/') => eprintln!("unknown command, try /help"),
        _ => {
            // optimistic local echo; the server never echoes plain chat
            // back to its sender
            println!("[me] {line}");
            session.send_chat(line).await?;
        }
    }
    Ok(true)
}

/// Persist one flushed path and broadcast its delta. The dirty flag
/// clears only when the HTTP save succeeded; on failure the edit stays
/// marked unsaved and the failure is reported.
async fn persist_path(
    api: &ApiClient,
    session: &mut WsSession,
    sync: &mut SyncState,
    sandbox: &ProcessSandbox,
    project_id: &str,
    path: &str,
) -> Result<(), ClientError> {
    let Some(save) = sync.flush(path)? else {
        return Ok(());
    };
    match api.update_file_tree(project_id, &save.tree).await {
        Ok(()) => {
            session.send_delta(&save.path, &save.content).await?;
            sync.confirm_saved(&save.path);
            // a running preview serves from the scratch directory; keep
            // its copy of the file current
            if sandbox.workdir().exists() {
                if let Err(e) = sandbox.write_file(&save.path, &save.content).await {
                    tracing::warn!("could not refresh sandbox copy of {path}: {e}");
                }
            }
        }
        Err(ClientError::Unauthorized) => return Err(ClientError::Unauthorized),
        Err(e) => {
            eprintln!("save failed for {path}: {e} (kept as unsaved, will retry)");
        }
    }
    Ok(())
}
