//! PNG-in-ICO container encoding
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header     reserved u16 = 0, type u16 = 1, count u16
//! directory  count x 16-byte entries
//! payloads   PNG blobs, in directory order, back to back
//! ```

use crate::raster::probe_png_dimensions;
use crate::FaviconError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};
use std::ops::Range;
use tracing::{debug, warn};

pub const ICO_HEADER_SIZE: usize = 6;
pub const ICO_DIR_ENTRY_SIZE: usize = 16;

/// Resource type of icons (cursors use 2)
const ICO_TYPE_ICON: u16 = 1;
/// Embedded PNGs are always declared as 32-bit
const ICO_BITS_PER_PIXEL: u16 = 32;

/// One 16-byte ICO directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoDirectoryEntry {
    /// Width in pixels, 0 meaning 256 or more
    pub width: u8,
    /// Height in pixels, 0 meaning 256 or more
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub planes: u16,
    pub bits_per_pixel: u16,
    /// Payload length in bytes
    pub size: u32,
    /// Absolute payload position in the file
    pub offset: u32,
}

impl IcoDirectoryEntry {
    fn for_png(width: u32, height: u32, size: u32, offset: u32) -> Self {
        Self {
            width: dimension_byte(width),
            height: dimension_byte(height),
            color_count: 0,
            reserved: 0,
            planes: 1,
            bits_per_pixel: ICO_BITS_PER_PIXEL,
            size,
            offset,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        dimension_pixels(self.width)
    }

    pub fn pixel_height(&self) -> u32 {
        dimension_pixels(self.height)
    }

    /// Byte range of the payload inside the container
    pub fn payload_range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }

    /// Payload bytes, if the entry points inside `data`
    pub fn payload<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.payload_range())
    }

    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            width: reader.read_u8()?,
            height: reader.read_u8()?,
            color_count: reader.read_u8()?,
            reserved: reader.read_u8()?,
            planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            size: reader.read_u32::<LittleEndian>()?,
            offset: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.width)?;
        writer.write_u8(self.height)?;
        writer.write_u8(self.color_count)?;
        writer.write_u8(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.size)?;
        writer.write_u32::<LittleEndian>(self.offset)?;
        Ok(())
    }
}

fn dimension_byte(pixels: u32) -> u8 {
    if pixels >= 256 {
        0
    } else {
        pixels as u8
    }
}

fn dimension_pixels(byte: u8) -> u32 {
    if byte == 0 {
        256
    } else {
        byte as u32
    }
}

/// Encoded ICO file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcoEncoding {
    /// A real container with one entry per accepted PNG
    Container {
        bytes: Vec<u8>,
        entries: Vec<IcoDirectoryEntry>,
    },
    /// The single input blob could not be probed and is written unchanged
    Passthrough(Vec<u8>),
}

impl IcoEncoding {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Container { bytes, .. } | Self::Passthrough(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Container { bytes, .. } | Self::Passthrough(bytes) => bytes,
        }
    }

    /// Directory entries; empty for a passthrough
    pub fn entries(&self) -> &[IcoDirectoryEntry] {
        match self {
            Self::Container { entries, .. } => entries,
            Self::Passthrough(_) => &[],
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough(_))
    }
}

/// Assemble PNG blobs into an ICO container, in input order.
///
/// Blobs whose PNG header cannot be read are skipped. If every blob is
/// skipped, a single input is passed through verbatim; otherwise assembly
/// fails.
pub fn encode_ico(blobs: &[Vec<u8>]) -> Result<IcoEncoding, FaviconError> {
    debug!(count = blobs.len(), "ico.encode");

    if blobs.is_empty() {
        return Err(FaviconError::ico_assembly_failure("No PNG data provided"));
    }

    let mut frames = Vec::with_capacity(blobs.len());
    for (index, blob) in blobs.iter().enumerate() {
        match probe_png_dimensions(blob) {
            Ok((width, height)) => frames.push((blob.as_slice(), width, height)),
            Err(e) => warn!(index, error = %e, "skipping ICO frame"),
        }
    }

    if frames.is_empty() {
        if let [only] = blobs {
            warn!("no ICO frame could be probed, writing the input unchanged");
            return Ok(IcoEncoding::Passthrough(only.clone()));
        }
        return Err(FaviconError::ico_assembly_failure(format!(
            "None of the {} PNG blobs could be read",
            blobs.len()
        )));
    }

    let count = u16::try_from(frames.len()).map_err(|_| {
        FaviconError::ico_assembly_failure(format!("Too many ICO frames: {}", frames.len()))
    })?;

    let mut offset = ICO_HEADER_SIZE + ICO_DIR_ENTRY_SIZE * frames.len();
    let mut entries = Vec::with_capacity(frames.len());
    for &(blob, width, height) in &frames {
        let size = to_u32(blob.len())?;
        entries.push(IcoDirectoryEntry::for_png(width, height, size, to_u32(offset)?));
        offset += blob.len();
    }

    let mut bytes = Vec::with_capacity(offset);
    write_container(&mut bytes, count, &entries, &frames)
        .map_err(|e| FaviconError::ico_assembly_failure(format!("Failed to write ICO: {}", e)))?;

    Ok(IcoEncoding::Container { bytes, entries })
}

fn to_u32(value: usize) -> Result<u32, FaviconError> {
    u32::try_from(value).map_err(|_| {
        FaviconError::ico_assembly_failure(format!("ICO exceeds 4 GiB ({} bytes)", value))
    })
}

fn write_container<W: Write>(
    writer: &mut W,
    count: u16,
    entries: &[IcoDirectoryEntry],
    frames: &[(&[u8], u32, u32)],
) -> io::Result<()> {
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(ICO_TYPE_ICON)?;
    writer.write_u16::<LittleEndian>(count)?;
    for entry in entries {
        entry.write(writer)?;
    }
    for (blob, _, _) in frames {
        writer.write_all(blob)?;
    }
    Ok(())
}

/// Parse and validate the directory of an ICO file.
pub fn read_ico_directory(data: &[u8]) -> Result<Vec<IcoDirectoryEntry>, FaviconError> {
    let mut cursor = Cursor::new(data);
    let invalid = |e: io::Error| FaviconError::decode_failure(format!("Truncated ICO: {}", e));

    let reserved = cursor.read_u16::<LittleEndian>().map_err(invalid)?;
    let resource_type = cursor.read_u16::<LittleEndian>().map_err(invalid)?;
    let count = cursor.read_u16::<LittleEndian>().map_err(invalid)?;

    if reserved != 0 || resource_type != ICO_TYPE_ICON {
        return Err(FaviconError::decode_failure(format!(
            "Not an ICO file (reserved {}, type {})",
            reserved, resource_type
        )));
    }

    let directory_end = ICO_HEADER_SIZE + ICO_DIR_ENTRY_SIZE * count as usize;
    if data.len() < directory_end {
        return Err(FaviconError::decode_failure(format!(
            "ICO directory of {} entries needs {} bytes, file has {}",
            count,
            directory_end,
            data.len()
        )));
    }

    let mut entries = Vec::with_capacity(count as usize);
    for index in 0..count {
        let entry = IcoDirectoryEntry::read(&mut cursor).map_err(invalid)?;
        let range = entry.payload_range();
        if range.start < directory_end || range.end > data.len() {
            return Err(FaviconError::decode_failure(format!(
                "ICO entry {} payload {:?} lies outside the file ({} bytes)",
                index,
                range,
                data.len()
            )));
        }
        entries.push(entry);
    }

    Ok(entries)
}
