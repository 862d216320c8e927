use crate::core_error::FtpError;
use crate::core_network::ControlWriter;
use tokio::io::AsyncWriteExt;

/// Sends a response to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Sends the reply line for a failed command. The session carries on.
pub async fn send_error(writer: &ControlWriter, error: &FtpError) -> Result<(), std::io::Error> {
    send_response(writer, error.to_ftp_response().as_bytes()).await
}

/// Builds the 220 greeting. Multi-line banners use the `220-` continuation form.
pub fn format_banner(banner: &str) -> String {
    let lines: Vec<&str> = banner.lines().collect();
    match lines.split_last() {
        None => "220 Service ready.\r\n".to_string(),
        Some((last, rest)) => {
            let mut greeting = String::new();
            for line in rest {
                greeting.push_str(&format!("220-{}\r\n", line));
            }
            greeting.push_str(&format!("220 {}\r\n", last));
            greeting
        }
    }
}

/// Quotes a path for a 257 reply, doubling embedded quotes.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}
