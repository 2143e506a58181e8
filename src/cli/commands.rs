//! CLI command implementations
//!
//! Each command loads the schema document, builds the section codec once,
//! then does its I/O. Nothing is retried: the first error ends the command,
//! except in `receive`, which logs bad frames and keeps listening.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::codec::Codec;
use crate::codegen::render_header;
use crate::form::FieldGroup;
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::SchemaDocument;
use crate::transport::{Endpoint, UdpReceiver, UdpSender};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{render_frame, render_layout, write_json, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Send {
            schema,
            section,
            url,
            values,
        } => send(&schema, &section, &url, &values).map(|_| ()),
        Command::Grab { schema, section, url } => grab(&schema, &section, &url),
        Command::Receive {
            schema,
            section,
            host,
            port,
        } => receive(&schema, &section, &host, port),
        Command::Gen { schema, output } => generate(&schema, &output),
        Command::Inspect { schema, section } => inspect(&schema, &section),
        Command::Serve { config } => serve(&config),
    }
}

/// Builds the codec for one section of a schema file
pub fn load_codec(schema_path: &Path, section: &str) -> CliResult<Codec> {
    let document = SchemaDocument::from_path(schema_path)?;
    Ok(Codec::new(document.section(section)?))
}

/// Reads a JSON object of field values
pub fn load_values(path: &Path) -> CliResult<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::input_error(format!("Failed to read values {}: {}", path.display(), e)))?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::input_error(format!(
            "{}: values must be a JSON object",
            path.display()
        ))),
    }
}

/// Packs a values file and sends it as one datagram; returns bytes sent.
pub fn send(schema_path: &Path, section: &str, url: &str, values_path: &Path) -> CliResult<usize> {
    let codec = load_codec(schema_path, section)?;
    let endpoint = Endpoint::parse(url)?;
    let frame = codec.pack_json(&load_values(values_path)?)?;

    let sent = UdpSender::connect(&endpoint)?.send_frame(&frame)?;
    log_event_with_fields(
        Event::FrameSent,
        &[
            ("bytes", &sent.to_string()),
            ("section", section),
            ("target", &endpoint.to_string()),
        ],
    );
    Ok(sent)
}

/// Binds, waits for one frame and prints it as pretty JSON.
pub fn grab(schema_path: &Path, section: &str, url: &str) -> CliResult<()> {
    let codec = load_codec(schema_path, section)?;
    let mut receiver = UdpReceiver::bind(&Endpoint::parse(url)?)?;

    let (frame, peer) = receiver.recv_frame()?;
    let record = codec.unpack(&frame)?;
    log_event_with_fields(
        Event::FrameReceived,
        &[
            ("bytes", &frame.len().to_string()),
            ("peer", &peer.to_string()),
            ("section", section),
        ],
    );
    write_json(&record.to_json())
}

/// Receives frames until the process is stopped.
pub fn receive(schema_path: &Path, section: &str, host: &str, port: u16) -> CliResult<()> {
    let codec = load_codec(schema_path, section)?;
    let groups = FieldGroup::defaults();
    let mut receiver = UdpReceiver::bind(&Endpoint::new(host, port))?;

    write_text(&format!(
        "Listening on {}\nExpected frame size: {} bytes\nSchema hash: {:#x}\n",
        receiver.local_addr()?,
        codec.frame_length(),
        codec.version_id()
    ))?;

    let mut count: u64 = 0;
    loop {
        let (frame, peer) = receiver.recv_frame()?;
        count += 1;
        match codec.unpack(&frame) {
            Ok(record) => {
                log_event_with_fields(
                    Event::FrameReceived,
                    &[
                        ("bytes", &frame.len().to_string()),
                        ("count", &count.to_string()),
                        ("peer", &peer.to_string()),
                    ],
                );
                write_text(&render_frame(&record, codec.table(), &groups))?;
            }
            Err(e) => {
                let preview: String = frame.iter().take(64).map(|b| format!("{:02x}", b)).collect();
                log_event_with_fields(
                    Event::UnpackFailed,
                    &[
                        ("bytes", &frame.len().to_string()),
                        ("code", e.code()),
                        ("count", &count.to_string()),
                        ("message", &e.to_string()),
                        ("peer", &peer.to_string()),
                        ("raw_hex", &preview),
                    ],
                );
            }
        }
    }
}

/// Writes the C++ header for every section of the schema file.
pub fn generate(schema_path: &Path, output: &Path) -> CliResult<()> {
    let sections = SchemaDocument::from_path(schema_path)?.sections()?;
    let header = render_header(&sections);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, header)?;

    log_event_with_fields(
        Event::HeaderGenerated,
        &[
            ("path", &output.display().to_string()),
            ("sections", &sections.len().to_string()),
        ],
    );
    Ok(())
}

/// Prints the layout of one section.
pub fn inspect(schema_path: &Path, section: &str) -> CliResult<()> {
    let codec = load_codec(schema_path, section)?;
    write_text(&render_layout(section, &codec))
}

/// Runs the HTTP API until the process is stopped.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    let server = HttpServer::from_config(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start())?;
    Ok(())
}
