//! WAV encoding for 16-bit stereo PCM.
//!
//! The header carries the frame count up front, so a render can stream
//! frames straight to the writer once the length is known.

use muse_engine::Frame;
use std::io::{self, Write};

const CHANNELS: u16 = 2;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * (BITS_PER_SAMPLE / 8);

/// Most frames a single RIFF file can describe.
pub const MAX_WAV_FRAMES: u32 = (u32::MAX - 36) / BLOCK_ALIGN as u32;

/// Write the RIFF, fmt and data chunk headers for `frame_count` frames.
pub fn write_header(w: &mut impl Write, frame_count: u32, sample_rate: u32) -> io::Result<()> {
    if frame_count > MAX_WAV_FRAMES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} frames exceed the WAV size limit", frame_count),
        ));
    }
    let data_size = frame_count * BLOCK_ALIGN as u32;

    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?; // PCM
    w.write_all(&CHANNELS.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * BLOCK_ALIGN as u32).to_le_bytes())?;
    w.write_all(&BLOCK_ALIGN.to_le_bytes())?;
    w.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())
}

/// Append interleaved little-endian samples.
pub fn write_frames(w: &mut impl Write, frames: &[Frame]) -> io::Result<()> {
    for frame in frames {
        w.write_all(&frame.left.to_le_bytes())?;
        w.write_all(&frame.right.to_le_bytes())?;
    }
    Ok(())
}

pub fn write_wav(w: &mut impl Write, frames: &[Frame], sample_rate: u32) -> io::Result<()> {
    let count = u32::try_from(frames.len()).unwrap_or(u32::MAX);
    write_header(w, count, sample_rate)?;
    write_frames(w, frames)
}

/// Encode a whole buffer. Panics past [`MAX_WAV_FRAMES`].
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(44 + frames.len() * BLOCK_ALIGN as usize);
    write_wav(&mut buf, frames, sample_rate).expect("Vec<u8> write cannot fail");
    buf
}
