use crate::core_transfer::ascii::AsciiEncoder;
use crate::core_transfer::error::TransferError;
use crate::core_transfer::mode::TransferType;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Copies `reader` to the data channel `writer` using the given representation type.
///
/// Binary is an exact byte copy. ASCII goes through [`AsciiEncoder`] so line
/// endings reach the wire as CRLF. Returns the number of source bytes read.
pub async fn send_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    transfer_type: TransferType,
    buffer_size: usize,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut encoder = AsciiEncoder::new();
    let mut encoded = Vec::new();
    let mut total: u64 = 0;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .await
            .map_err(TransferError::Source)?;
        if bytes_read == 0 {
            break;
        }

        let chunk = &buffer[..bytes_read];
        let outgoing = match transfer_type {
            TransferType::Binary => chunk,
            TransferType::Ascii => {
                encoded.clear();
                encoder.encode(chunk, &mut encoded);
                encoded.as_slice()
            }
        };
        writer
            .write_all(outgoing)
            .await
            .map_err(TransferError::DataChannel)?;

        total += bytes_read as u64;
    }

    writer.flush().await.map_err(TransferError::DataChannel)?;
    Ok(total)
}
