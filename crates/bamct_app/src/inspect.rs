use anyhow::{Context, Result};
use bamct_core::{BlockSource, HeaderDescriptor};
use bamct_io::{MmapReader, read_header};
use humansize::{BINARY, format_size};
use std::path::Path;

pub fn run_inspect(path: &Path, json: bool, hexdump: bool) -> Result<()> {
    let descriptor = read_header(path)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print_descriptor(&descriptor);
    }

    if hexdump {
        let region = read_header_region(path, &descriptor)?;
        println!();
        hex_dump(&region);
    }

    Ok(())
}

/// Reads the bytes before the pixel data, stopping early at end of file.
///
/// The declared offset comes from untrusted header fields and can far
/// exceed the file, so the buffer is sized by whichever is smaller.
fn read_header_region(path: &Path, descriptor: &HeaderDescriptor) -> Result<Vec<u8>> {
    let mut reader =
        MmapReader::new(path).with_context(|| format!("Failed to map {}", path.display()))?;
    let len = descriptor.pixel_data_offset.min(reader.size()?);
    let len = usize::try_from(len).context("Header region does not fit in memory")?;

    let mut buffer = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        let bytes_read = reader
            .read_chunk(filled as u64, &mut buffer[filled..])
            .context("Failed to read header region")?;
        if bytes_read == 0 {
            break;
        }
        filled += bytes_read;
    }
    buffer.truncate(filled);

    Ok(buffer)
}

pub fn print_descriptor(d: &HeaderDescriptor) {
    println!("Embedded name:     {}", d.embedded_name);
    println!("Format:            {}", d.variant);
    println!("Byte order:        {}", d.byte_order);
    println!("Dimensions:        {} x {}", d.width, d.height);
    println!("Frames:            {}", d.frame_count);
    println!("Pixel type:        {}", d.pixel_type);
    println!("Pixel data offset: {}", d.pixel_data_offset);
    if let Ok(frame_bytes) = d.frame_bytes() {
        println!("Frame size:        {}", format_size(frame_bytes, BINARY));
    }
}

/// Displays a buffer in hexadecimal format (16 bytes per line).
/// Format: `OFFSET | HEX BYTES | ASCII`
fn hex_dump(data: &[u8]) {
    println!("Offset   | 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F | ASCII");
    println!("{}", "-".repeat(75));

    for (i, chunk) in data.chunks(16).enumerate() {
        println!("{}", hex_line(i * 16, chunk));
    }
}

fn hex_line(offset: usize, chunk: &[u8]) -> String {
    let mut line = format!("{:08x} | ", offset);

    for j in 0..16 {
        match chunk.get(j) {
            Some(byte) => line.push_str(&format!("{:02x} ", byte)),
            None => line.push_str("   "),
        }
        if j == 7 {
            line.push(' ');
        }
    }

    line.push_str("| ");
    for byte in chunk {
        line.push(if byte.is_ascii_graphic() || *byte == b' ' {
            *byte as char
        } else {
            '.'
        });
    }
    line
}
