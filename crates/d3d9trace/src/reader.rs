use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::{Result, TraceReadError};
use crate::format::{
    DrawCall, DrawCallArgs, DrawCallKind, ResourceDesc, ResourceEntry, ResourceType, TraceHeader,
    RESOURCE_ENTRY_SIZE, TRACE_MAGIC,
};
use crate::topology::PrimitiveType;

/// Knobs for one decode pass.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Upper bound on draw-call records read from one table, regardless of
    /// what the header claims. Defends against a corrupt `draw_call_count`
    /// causing unbounded work; hitting it is surfaced via
    /// [`TraceFrame::draw_call_cap_hit`], never silent.
    pub draw_call_cap: u32,
    /// Retain the inline vertex/index payload bytes of user-pointer draws on
    /// the decoded record instead of discarding them.
    pub keep_inline_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            draw_call_cap: 10_000,
            keep_inline_data: false,
        }
    }
}

/// Everything decoded from one trace file.
///
/// Tables may be shorter than the header declared: a short read mid-table
/// ends that table early without error (incomplete captures are still
/// inspectable). Structural failures are confined to the phase they occurred
/// in and stored on the corresponding `*_error` field; the header itself is
/// always valid if a `TraceFrame` exists at all.
#[derive(Debug)]
pub struct TraceFrame {
    pub header: TraceHeader,
    /// Draw-call records actually decoded, in table order.
    pub draw_calls: Vec<DrawCall>,
    /// Structural failure that aborted the draw-call phase, if any
    /// (`UnknownDrawCallKind` or an out-of-range table offset).
    pub draw_call_error: Option<TraceReadError>,
    /// True when the scan stopped at [`DecodeOptions::draw_call_cap`] rather
    /// than at the end of the table.
    pub draw_call_cap_hit: bool,
    /// Resource entries actually decoded, in table order.
    pub resources: Vec<ResourceEntry>,
    /// Structural failure that aborted the resource phase, if any.
    pub resource_error: Option<TraceReadError>,
}

/// Decodes one trace file from an opened stream.
///
/// Fails outright only when nothing in the file can be trusted: a truncated
/// or wrong-magic header (the header's offsets are meaningless once the
/// magic is wrong) or a genuine I/O error. Everything else degrades to a
/// partial [`TraceFrame`].
pub fn decode_frame<R: Read + Seek>(reader: R, options: &DecodeOptions) -> Result<TraceFrame> {
    let mut cursor = ByteCursor::new(reader)?;

    let header = read_header(&mut cursor)?;
    if header.magic != TRACE_MAGIC {
        return Err(TraceReadError::InvalidMagic {
            found: header.magic,
        });
    }
    debug!(
        frame = header.frame_number,
        draw_calls = header.draw_call_count,
        resources = header.resource_count,
        "decoded trace header"
    );

    let mut frame = TraceFrame {
        header,
        draw_calls: Vec::new(),
        draw_call_error: None,
        draw_call_cap_hit: false,
        resources: Vec::new(),
        resource_error: None,
    };

    if frame.header.draw_call_count > 0 && frame.header.draw_calls_offset > 0 {
        decode_draw_call_table(&mut cursor, options, &mut frame);
    }
    if frame.header.resource_count > 0 && frame.header.resources_offset > 0 {
        decode_resource_table(&mut cursor, &mut frame);
    }

    Ok(frame)
}

/// Convenience wrapper: open `path` and decode it as a trace file.
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<TraceFrame> {
    let file = File::open(path)?;
    decode_frame(BufReader::new(file), options)
}

fn decode_draw_call_table<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    options: &DecodeOptions,
    frame: &mut TraceFrame,
) {
    if let Err(err) = cursor.seek_to(frame.header.draw_calls_offset) {
        frame.draw_call_error = Some(err);
        return;
    }

    let declared = frame.header.draw_call_count;
    let limit = declared.min(options.draw_call_cap);
    for _ in 0..limit {
        match read_draw_call(cursor, options) {
            Ok(call) => frame.draw_calls.push(call),
            // A short read means the capture ended mid-table; report the
            // records we have.
            Err(err) if err.is_short_read() => return,
            Err(err) => {
                // The record's true length is unknowable, so the rest of the
                // table cannot be scanned.
                frame.draw_call_error = Some(err);
                return;
            }
        }
    }
    if declared > options.draw_call_cap {
        warn!(
            declared,
            cap = options.draw_call_cap,
            "draw-call table exceeds safety cap; scan stopped at cap"
        );
        frame.draw_call_cap_hit = true;
    }
}

fn decode_resource_table<R: Read + Seek>(cursor: &mut ByteCursor<R>, frame: &mut TraceFrame) {
    if let Err(err) = cursor.seek_to(frame.header.resources_offset) {
        frame.resource_error = Some(err);
        return;
    }

    for _ in 0..frame.header.resource_count {
        match read_resource_entry(cursor) {
            Ok(entry) => frame.resources.push(entry),
            Err(err) if err.is_short_read() => return,
            Err(err) => {
                frame.resource_error = Some(err);
                return;
            }
        }
    }
}

/// Reads the fixed 88-byte header. The cursor must be at file start.
///
/// Does not validate the magic; [`decode_frame`] does that so callers
/// inspecting foreign blobs can still look at the raw field values.
pub fn read_header<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<TraceHeader> {
    let header: Result<TraceHeader> = (|| {
        let magic = cursor.read_u64()?;
        let version = cursor.read_u32()?;
        let flags = cursor.read_u32()?;
        let frame_number = cursor.read_u32()?;
        let draw_call_count = cursor.read_u32()?;
        let resource_count = cursor.read_u32()?;
        let backbuffer_width = cursor.read_u32()?;
        let backbuffer_height = cursor.read_u32()?;
        // The C struct aligns the following u64 group to 8 bytes, leaving a
        // 4-byte gap after the seven u32 fields above.
        cursor.skip(4)?;
        let state_offset = cursor.read_u64()?;
        let draw_calls_offset = cursor.read_u64()?;
        let resources_offset = cursor.read_u64()?;
        let resource_data_offset = cursor.read_u64()?;
        let reference_frame_offset = cursor.read_u64()?;
        let total_size = cursor.read_u64()?;
        Ok(TraceHeader {
            magic,
            version,
            flags,
            frame_number,
            draw_call_count,
            resource_count,
            backbuffer_width,
            backbuffer_height,
            state_offset,
            draw_calls_offset,
            resources_offset,
            resource_data_offset,
            reference_frame_offset,
            total_size,
        })
    })();
    header.map_err(|err| match err {
        TraceReadError::TruncatedInput { .. } => TraceReadError::TruncatedHeader,
        other => other,
    })
}

/// Reads one draw-call record. The cursor must be at the record's first
/// byte; on success it is left exactly at the start of the next record
/// (inline user-pointer payloads included).
pub fn read_draw_call<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    options: &DecodeOptions,
) -> Result<DrawCall> {
    let mut prefix = [0u8; 8];
    cursor.read_exact(&mut prefix)?;

    let kind_raw = prefix[0];
    let primitive_type = PrimitiveType::from_u8(prefix[1]);
    let has_state_delta = prefix[2] != 0;
    // prefix[3] is reserved padding.
    let primitive_count = u32::from_le_bytes(prefix[4..8].try_into().unwrap());

    let kind =
        DrawCallKind::from_u8(kind_raw).ok_or(TraceReadError::UnknownDrawCallKind(kind_raw))?;

    let args = match kind {
        DrawCallKind::DrawPrimitive => DrawCallArgs::Direct {
            start_vertex: cursor.read_u32()?,
        },
        DrawCallKind::DrawIndexedPrimitive => DrawCallArgs::Indexed {
            base_vertex_index: cursor.read_i32()?,
            min_vertex_index: cursor.read_u32()?,
            num_vertices: cursor.read_u32()?,
            start_index: cursor.read_u32()?,
        },
        DrawCallKind::DrawPrimitiveUp => {
            let vertex_stride = cursor.read_u32()?;
            let vertex_data_size = cursor.read_u32()?;
            let vertex_data = consume_inline(cursor, vertex_data_size, options)?;
            DrawCallArgs::DirectUp {
                vertex_stride,
                vertex_data_size,
                vertex_data,
            }
        }
        DrawCallKind::DrawIndexedPrimitiveUp => {
            let min_vertex_index = cursor.read_u32()?;
            let num_vertices = cursor.read_u32()?;
            let vertex_stride = cursor.read_u32()?;
            let index_format = cursor.read_u32()?;
            let vertex_data_size = cursor.read_u32()?;
            let index_data_size = cursor.read_u32()?;
            let vertex_data = consume_inline(cursor, vertex_data_size, options)?;
            let index_data = consume_inline(cursor, index_data_size, options)?;
            DrawCallArgs::IndexedUp {
                min_vertex_index,
                num_vertices,
                vertex_stride,
                index_format,
                vertex_data_size,
                index_data_size,
                vertex_data,
                index_data,
            }
        }
    };

    Ok(DrawCall {
        primitive_type,
        has_state_delta,
        primitive_count,
        args,
    })
}

/// Consumes an inline user-pointer payload of `size` bytes. The bytes must
/// be fully consumed even when discarded, or every subsequent record in the
/// table would be misread.
fn consume_inline<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    size: u32,
    options: &DecodeOptions,
) -> Result<Option<Vec<u8>>> {
    if size == 0 {
        return Ok(options.keep_inline_data.then(Vec::new));
    }
    if options.keep_inline_data {
        let mut data = vec![0u8; size as usize];
        cursor.read_exact(&mut data)?;
        Ok(Some(data))
    } else {
        cursor.skip(u64::from(size))?;
        Ok(None)
    }
}

/// Reads one fixed 56-byte resource-table entry, consuming all 56 bytes
/// regardless of which union arm applies.
pub fn read_resource_entry<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<ResourceEntry> {
    let mut raw = [0u8; RESOURCE_ENTRY_SIZE as usize];
    cursor
        .read_exact(&mut raw)
        .map_err(|err| match err {
            TraceReadError::TruncatedInput { .. } => TraceReadError::TruncatedResourceEntry,
            other => other,
        })?;

    let id = u32::from_le_bytes(raw[0..4].try_into().unwrap());
    let kind = ResourceType::from_u8(raw[4]);
    // raw[5..8] is padding after the type byte.
    let data_offset = u64::from_le_bytes(raw[8..16].try_into().unwrap());
    let data_size = u64::from_le_bytes(raw[16..24].try_into().unwrap());

    // Union region at bytes 24..52; unused arms' bytes are ignored, never
    // reinterpreted. raw[52..56] is trailing padding.
    let u32_at = |offset: usize| u32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap());
    let desc = match kind {
        ResourceType::Texture2d => ResourceDesc::Texture2d {
            width: u32_at(24),
            height: u32_at(28),
            mip_levels: u32_at(32),
            format: u32_at(36),
        },
        ResourceType::VertexBuffer => ResourceDesc::VertexBuffer {
            size: u32_at(24),
            usage: u32_at(28),
            fvf: u32_at(32),
            pool: u32_at(36),
        },
        ResourceType::IndexBuffer => ResourceDesc::IndexBuffer {
            size: u32_at(24),
            usage: u32_at(28),
            format: u32_at(32),
            pool: u32_at(36),
        },
        ResourceType::VertexShader | ResourceType::PixelShader => ResourceDesc::Shader {
            bytecode_size: u32_at(24),
        },
        ResourceType::VertexDecl => ResourceDesc::VertexDecl {
            element_count: u32_at(24),
        },
        ResourceType::TextureCube | ResourceType::Texture3d | ResourceType::Unknown(_) => {
            ResourceDesc::Opaque
        }
    };

    Ok(ResourceEntry {
        id,
        kind,
        data_offset,
        data_size,
        desc,
    })
}
