//! `synth`: writes a synthetic acquisition, optionally growing it.
//!
//! Frames are appended before the frame-count field is rewritten, so a
//! watcher never sees a count ahead of the data on disk.

use anyhow::{Context, Result};
use bamct_core::header::frame_count_field_offset;
use bamct_core::{ByteOrder, FormatVariant, HeaderFields, HeaderWriter, PixelType};
use clap::{Args, ValueEnum};
use crossbeam_channel::RecvTimeoutError;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Data format (.dd)
    Dd,
    /// Image format (.db)
    Db,
}

impl From<VariantArg> for FormatVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Dd => FormatVariant::DataFormat,
            VariantArg::Db => FormatVariant::ImageFormat,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SynthArgs {
    pub path: PathBuf,

    #[arg(long, default_value_t = 64)]
    pub width: u32,

    #[arg(long, default_value_t = 64)]
    pub height: u32,

    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Pixel type code: 1 = 8-bit, 2 = 16-bit unsigned, 4 = 32-bit float.
    #[arg(long, default_value_t = 2)]
    pub pixel_type: u32,

    #[arg(long, value_enum, default_value_t = VariantArg::Dd)]
    pub variant: VariantArg,

    #[arg(long, default_value_t = false)]
    pub big_endian: bool,

    /// Up to 8 characters placed before the format markers in the embedded name.
    #[arg(long, default_value = "bamct")]
    pub stem: String,

    /// Frames to append after the initial write.
    #[arg(long, default_value_t = 0)]
    pub grow: u32,

    #[arg(long, default_value_t = 1000)]
    pub every_ms: u64,
}

impl SynthArgs {
    fn fields(&self, frame_count: u32) -> HeaderFields {
        let byte_order = if self.big_endian {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        };
        let mut fields = HeaderFields::new(self.variant.into(), byte_order);
        fields.stem = self.stem.clone();
        fields.width = self.width;
        fields.height = self.height;
        fields.frame_count = frame_count;
        fields.pixel_type_code = self.pixel_type;
        fields
    }
}

pub fn run_synth(args: &SynthArgs) -> Result<()> {
    if !PixelType::from_code(args.pixel_type).is_recognized() {
        tracing::warn!(code = args.pixel_type, "writing an unrecognized pixel type");
    }

    let fields = args.fields(args.frames);
    let frame_len = frame_len(&fields)?;

    let mut file = File::create(&args.path)
        .with_context(|| format!("Failed to create {}", args.path.display()))?;
    file.write_all(&HeaderWriter::new().encode_padded(&fields)?)?;
    for frame in 0..args.frames {
        append_frame(&mut file, frame, frame_len)?;
    }
    file.sync_data()?;
    println!(
        "Wrote {} with {} frames ({})",
        args.path.display(),
        args.frames,
        FormatVariant::from(args.variant)
    );

    if args.grow == 0 {
        return Ok(());
    }

    let interrupts = crate::install_interrupt_handler()?;
    let every = Duration::from_millis(args.every_ms);

    for frame in args.frames..args.frames.saturating_add(args.grow) {
        match interrupts.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                println!("Interrupted at {} frames", frame);
                return Ok(());
            }
        }

        append_frame(&mut file, frame, frame_len)?;
        file.sync_data()?;
        rewrite_header(&args.path, &args.fields(frame + 1))?;
        println!("Appended frame {}", frame + 1);
    }

    Ok(())
}

fn frame_len(fields: &HeaderFields) -> Result<usize> {
    let bytes = u64::from(fields.width)
        .checked_mul(u64::from(fields.height))
        .and_then(|n| n.checked_mul(u64::from(fields.pixel_type_code)))
        .context("Frame size overflows")?;
    usize::try_from(bytes).context("Frame does not fit in memory")
}

/// Frame `index` (0-based) is filled with its index, wrapped to a byte.
fn append_frame(file: &mut File, index: u32, len: usize) -> Result<()> {
    file.seek(SeekFrom::End(0))?;
    file.write_all(&vec![index as u8; len])
        .with_context(|| format!("Failed to append frame {}", index + 1))?;
    Ok(())
}

/// Rewrites only the frame-count field of an existing file.
pub fn rewrite_header(path: &Path, fields: &HeaderFields) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.seek(SeekFrom::Start(frame_count_field_offset(fields.variant)))?;
    file.write_all(&fields.byte_order.write_u32(fields.frame_count))?;
    file.sync_data()?;
    Ok(())
}
