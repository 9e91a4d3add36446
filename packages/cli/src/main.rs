//! `baize` — command-line tool for Baize tabletop servers.
//!
//! Drives the whole REST surface from a shell: inspect the server, create
//! and delete rooms, read and replace table states, move pieces, upload
//! assets. Useful for scripted room administration and for poking at a
//! server while developing against it.
//!
//! The server is addressed with `--server` or the `BAIZE_SERVER`
//! environment variable. Subcommands that take a JSON payload read it from
//! a file path or from stdin (`-`):
//!
//! ```sh
//! baize --server https://play.example.org/baize/api info
//! baize room create friday-dungeon --template dungeon
//! echo '{"x": 256, "y": 192}' | baize piece patch friday-dungeon b1f0a2 -
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use baize_api::{AssetUpload, Piece, PiecePatch, RoomCreate, StateId, TemplatePatch};
use baize_client::{Api, ApiError, Snapshot};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// baize — tabletop server CLI
///
/// Inspect and administrate rooms on a Baize server.
#[derive(Parser)]
#[command(name = "baize", version, about, long_about = None)]
struct Cli {
    /// Base URL of the server's API root, e.g. https://host/baize/api
    #[arg(long, env = "BAIZE_SERVER", value_name = "URL", global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the server's discovery document.
    Info,

    /// List the templates new rooms can start from.
    Templates,

    /// Create, inspect and delete rooms.
    #[command(subcommand)]
    Room(RoomCommand),

    /// Read, replace and check table states.
    #[command(subcommand)]
    State(StateCommand),

    /// Add, change and remove pieces on a state.
    #[command(subcommand)]
    Piece(PieceCommand),

    /// Upload assets into a room's library.
    #[command(subcommand)]
    Asset(AssetCommand),
}

#[derive(Subcommand)]
enum RoomCommand {
    /// Create a room and print it.
    Create {
        /// Room name, also its URL path segment.
        name: String,

        /// Template to populate the room from (server default otherwise).
        #[arg(long, value_name = "NAME")]
        template: Option<String>,

        /// Password protecting the room.
        #[arg(long, value_name = "PASSWORD")]
        auth: Option<String>,

        /// Snapshot archive to seed the room's content from.
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },

    /// Print a room as JSON, library included.
    Show { name: String },

    /// Print the room's digest map for change detection.
    Digest { name: String },

    /// Patch the room's template from a JSON file (or `-` for stdin)
    /// and print the merged result.
    Template { name: String, file: PathBuf },

    /// Delete a room and everything in it.
    Rm { name: String },
}

#[derive(Subcommand)]
enum StateCommand {
    /// Print every piece of a state as JSON.
    Get {
        room: String,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Replace a whole state from a JSON array of pieces (or `-` for stdin).
    Put {
        room: String,
        file: PathBuf,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Print the state's digest without fetching the body.
    Check {
        room: String,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },
}

#[derive(Subcommand)]
enum PieceCommand {
    /// Add a piece from a JSON file (or `-` for stdin); prints it with
    /// its server-assigned id.
    Add {
        room: String,
        file: PathBuf,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Replace one piece wholesale from a JSON file (or `-` for stdin).
    Set {
        room: String,
        piece: String,
        file: PathBuf,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Patch fields of one piece from a JSON file (or `-` for stdin).
    Patch {
        room: String,
        piece: String,
        file: PathBuf,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Patch many pieces in one call from a JSON array of patches, each
    /// carrying the id of its target piece.
    PatchAll {
        room: String,
        file: PathBuf,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },

    /// Remove a piece from the state.
    Rm {
        room: String,
        piece: String,

        /// State id 0-9; 1 is the live table.
        #[arg(long, value_name = "ID", default_value = "1")]
        state: StateId,
    },
}

#[derive(Subcommand)]
enum AssetCommand {
    /// Upload an asset described by a JSON file (or `-` for stdin);
    /// prints the library entry.
    Add { room: String, file: PathBuf },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baize_client=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let base = cli
        .server
        .unwrap_or_else(|| fatal("no server given: pass --server URL or set BAIZE_SERVER"));
    let api = Api::new(base);

    match cli.command {
        Command::Info => {
            let info = api.server_info().await.unwrap_or_else(|e| api_fatal(e));
            print_json(&info);
        }

        Command::Templates => {
            let templates = api.templates().await.unwrap_or_else(|e| api_fatal(e));
            for name in templates {
                println!("{name}");
            }
        }

        Command::Room(cmd) => match cmd {
            RoomCommand::Create {
                name,
                template,
                auth,
                snapshot,
            } => {
                let create = RoomCreate {
                    name,
                    template,
                    auth,
                };
                let snapshot = snapshot.map(|path| {
                    let bytes = fs::read(&path).unwrap_or_else(|e| {
                        fatal(&format!("failed to read {}: {}", path.display(), e))
                    });
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "snapshot.zip".to_string());
                    Snapshot { filename, bytes }
                });
                let room = api
                    .create_room(&create, snapshot)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&room);
            }

            RoomCommand::Show { name } => {
                let room = api.room(&name).await.unwrap_or_else(|e| api_fatal(e));
                print_json(&room);
            }

            RoomCommand::Digest { name } => {
                let digest = api.room_digest(&name).await.unwrap_or_else(|e| api_fatal(e));
                print_json(&digest);
            }

            RoomCommand::Template { name, file } => {
                let patch: TemplatePatch = parse_json(&read_input(&file), "a template patch");
                let template = api
                    .patch_template(&name, &patch)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&template);
            }

            RoomCommand::Rm { name } => {
                api.delete_room(&name).await.unwrap_or_else(|e| api_fatal(e));
            }
        },

        Command::State(cmd) => match cmd {
            StateCommand::Get { room, state } => {
                let pieces = api.state(&room, state).await.unwrap_or_else(|e| api_fatal(e));
                print_json(&pieces);
            }

            StateCommand::Put { room, file, state } => {
                let pieces: Vec<Piece> = parse_json(&read_input(&file), "an array of pieces");
                let pieces = api
                    .put_state(&room, state, &pieces)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&pieces);
            }

            StateCommand::Check { room, state } => {
                let headers = api
                    .head_state(&room, state)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                match headers.get("x-state-digest").and_then(|v| v.to_str().ok()) {
                    Some(digest) => println!("{digest}"),
                    None => fatal("server sent no digest header"),
                }
            }
        },

        Command::Piece(cmd) => match cmd {
            PieceCommand::Add { room, file, state } => {
                let piece: Piece = parse_json(&read_input(&file), "a piece");
                let piece = api
                    .post_piece(&room, state, &piece)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&piece);
            }

            PieceCommand::Set {
                room,
                piece,
                file,
                state,
            } => {
                let body: Piece = parse_json(&read_input(&file), "a piece");
                let updated = api
                    .put_piece(&room, state, &piece, &body)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&updated);
            }

            PieceCommand::Patch {
                room,
                piece,
                file,
                state,
            } => {
                let patch: PiecePatch = parse_json(&read_input(&file), "a piece patch");
                let updated = api
                    .patch_piece(&room, state, &piece, &patch)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&updated);
            }

            PieceCommand::PatchAll { room, file, state } => {
                let patches: Vec<PiecePatch> =
                    parse_json(&read_input(&file), "an array of piece patches");
                let updated = api
                    .patch_pieces(&room, state, &patches)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&updated);
            }

            PieceCommand::Rm { room, piece, state } => {
                api.delete_piece(&room, state, &piece)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
            }
        },

        Command::Asset(cmd) => match cmd {
            AssetCommand::Add { room, file } => {
                let upload: AssetUpload = parse_json(&read_input(&file), "an asset upload");
                let asset = api
                    .post_asset(&room, &upload)
                    .await
                    .unwrap_or_else(|e| api_fatal(e));
                print_json(&asset);
            }
        },
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path)
            .unwrap_or_else(|e| fatal(&format!("failed to read {}: {}", path.display(), e)))
    }
}

/// Parse a JSON payload, exiting with a readable message when it is not
/// the expected shape.
fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> T {
    serde_json::from_str(json)
        .unwrap_or_else(|e| fatal(&format!("failed to parse input as {}: {}", what, e)))
}

/// Pretty-print a reply to stdout.
fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

/// Print what the server said and exit with code 2.
fn api_fatal(err: ApiError) -> ! {
    match err {
        ApiError::UnexpectedStatus { status, body } => {
            fatal(&format!("server answered {}: {}", status, body))
        }
        other => fatal(&other.to_string()),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("baize: {}", msg);
    process::exit(2);
}
