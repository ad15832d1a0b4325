//! Trace encoding.
//!
//! Pure builders that return fully formed bytes so callers decide how to
//! write them (to disk, into a `Vec`, over a pipe). Used by this crate's own
//! integration tests to build fixtures and by tooling that needs synthetic
//! traces; this is not capture instrumentation.

use crate::format::{
    DrawCall, DrawCallArgs, ResourceDesc, ResourceEntry, TraceHeader, RESOURCE_ENTRY_SIZE,
    TRACE_HEADER_SIZE, TRACE_MAGIC, TRACE_VERSION,
};

/// Encodes the fixed header. Always exactly [`TRACE_HEADER_SIZE`] bytes,
/// explicit alignment padding included.
pub fn encode_header(header: &TraceHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(TRACE_HEADER_SIZE as usize);
    out.extend_from_slice(&header.magic.to_le_bytes());
    out.extend_from_slice(&header.version.to_le_bytes());
    out.extend_from_slice(&header.flags.to_le_bytes());
    out.extend_from_slice(&header.frame_number.to_le_bytes());
    out.extend_from_slice(&header.draw_call_count.to_le_bytes());
    out.extend_from_slice(&header.resource_count.to_le_bytes());
    out.extend_from_slice(&header.backbuffer_width.to_le_bytes());
    out.extend_from_slice(&header.backbuffer_height.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // alignment gap before the u64 group
    out.extend_from_slice(&header.state_offset.to_le_bytes());
    out.extend_from_slice(&header.draw_calls_offset.to_le_bytes());
    out.extend_from_slice(&header.resources_offset.to_le_bytes());
    out.extend_from_slice(&header.resource_data_offset.to_le_bytes());
    out.extend_from_slice(&header.reference_frame_offset.to_le_bytes());
    out.extend_from_slice(&header.total_size.to_le_bytes());
    debug_assert_eq!(out.len(), TRACE_HEADER_SIZE as usize);
    out
}

/// Encodes one draw-call record, inline user-pointer payloads included.
///
/// When a UP variant declares a payload size but carries no retained bytes
/// (`vertex_data`/`index_data` of `None`), the declared size is emitted as
/// zero fill so the record still occupies its true on-disk length.
pub fn encode_draw_call(call: &DrawCall) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(call.kind().to_u8());
    out.push(call.primitive_type.to_u8());
    out.push(u8::from(call.has_state_delta));
    out.push(0); // reserved
    out.extend_from_slice(&call.primitive_count.to_le_bytes());

    match &call.args {
        DrawCallArgs::Direct { start_vertex } => {
            out.extend_from_slice(&start_vertex.to_le_bytes());
        }
        DrawCallArgs::Indexed {
            base_vertex_index,
            min_vertex_index,
            num_vertices,
            start_index,
        } => {
            out.extend_from_slice(&base_vertex_index.to_le_bytes());
            out.extend_from_slice(&min_vertex_index.to_le_bytes());
            out.extend_from_slice(&num_vertices.to_le_bytes());
            out.extend_from_slice(&start_index.to_le_bytes());
        }
        DrawCallArgs::DirectUp {
            vertex_stride,
            vertex_data_size,
            vertex_data,
        } => {
            out.extend_from_slice(&vertex_stride.to_le_bytes());
            out.extend_from_slice(&vertex_data_size.to_le_bytes());
            push_payload(&mut out, *vertex_data_size, vertex_data.as_deref());
        }
        DrawCallArgs::IndexedUp {
            min_vertex_index,
            num_vertices,
            vertex_stride,
            index_format,
            vertex_data_size,
            index_data_size,
            vertex_data,
            index_data,
        } => {
            out.extend_from_slice(&min_vertex_index.to_le_bytes());
            out.extend_from_slice(&num_vertices.to_le_bytes());
            out.extend_from_slice(&vertex_stride.to_le_bytes());
            out.extend_from_slice(&index_format.to_le_bytes());
            out.extend_from_slice(&vertex_data_size.to_le_bytes());
            out.extend_from_slice(&index_data_size.to_le_bytes());
            push_payload(&mut out, *vertex_data_size, vertex_data.as_deref());
            push_payload(&mut out, *index_data_size, index_data.as_deref());
        }
    }
    out
}

fn push_payload(out: &mut Vec<u8>, declared_size: u32, data: Option<&[u8]>) {
    match data {
        Some(bytes) => {
            debug_assert_eq!(bytes.len(), declared_size as usize);
            out.extend_from_slice(bytes);
        }
        None => out.extend(std::iter::repeat(0u8).take(declared_size as usize)),
    }
}

/// Encodes one resource-table entry. Always exactly [`RESOURCE_ENTRY_SIZE`]
/// bytes: padding after the type byte, zero fill for the unused tail of the
/// union region, and trailing stride padding.
pub fn encode_resource_entry(entry: &ResourceEntry) -> Vec<u8> {
    let mut out = Vec::with_capacity(RESOURCE_ENTRY_SIZE as usize);
    out.extend_from_slice(&entry.id.to_le_bytes());
    out.push(entry.kind.to_u8());
    out.extend_from_slice(&[0u8; 3]); // padding after the type byte
    out.extend_from_slice(&entry.data_offset.to_le_bytes());
    out.extend_from_slice(&entry.data_size.to_le_bytes());

    // Union region: bytes 24..52.
    match &entry.desc {
        ResourceDesc::Texture2d {
            width,
            height,
            mip_levels,
            format,
        } => {
            out.extend_from_slice(&width.to_le_bytes());
            out.extend_from_slice(&height.to_le_bytes());
            out.extend_from_slice(&mip_levels.to_le_bytes());
            out.extend_from_slice(&format.to_le_bytes());
        }
        ResourceDesc::VertexBuffer {
            size,
            usage,
            fvf,
            pool,
        } => {
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&usage.to_le_bytes());
            out.extend_from_slice(&fvf.to_le_bytes());
            out.extend_from_slice(&pool.to_le_bytes());
        }
        ResourceDesc::IndexBuffer {
            size,
            usage,
            format,
            pool,
        } => {
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&usage.to_le_bytes());
            out.extend_from_slice(&format.to_le_bytes());
            out.extend_from_slice(&pool.to_le_bytes());
        }
        ResourceDesc::Shader { bytecode_size } => {
            out.extend_from_slice(&bytecode_size.to_le_bytes());
        }
        ResourceDesc::VertexDecl { element_count } => {
            out.extend_from_slice(&element_count.to_le_bytes());
        }
        ResourceDesc::Opaque => {}
    }
    out.resize(RESOURCE_ENTRY_SIZE as usize, 0);
    out
}

/// Assembles a complete single-frame trace file: header, draw-call table,
/// resource table, with counts and offsets computed from what was pushed.
///
/// Table offsets are 0 when the corresponding table is empty, matching the
/// format's "section absent" convention.
pub struct TraceWriter {
    frame_number: u32,
    backbuffer_width: u32,
    backbuffer_height: u32,
    draw_calls: Vec<DrawCall>,
    resources: Vec<ResourceEntry>,
}

impl TraceWriter {
    pub fn new(frame_number: u32) -> Self {
        Self {
            frame_number,
            backbuffer_width: 0,
            backbuffer_height: 0,
            draw_calls: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn backbuffer(mut self, width: u32, height: u32) -> Self {
        self.backbuffer_width = width;
        self.backbuffer_height = height;
        self
    }

    pub fn push_draw_call(&mut self, call: DrawCall) {
        self.draw_calls.push(call);
    }

    pub fn push_resource(&mut self, entry: ResourceEntry) {
        self.resources.push(entry);
    }

    pub fn finish(self) -> Vec<u8> {
        let mut draw_table = Vec::new();
        for call in &self.draw_calls {
            draw_table.extend_from_slice(&encode_draw_call(call));
        }
        let mut resource_table = Vec::new();
        for entry in &self.resources {
            resource_table.extend_from_slice(&encode_resource_entry(entry));
        }

        let header_size = u64::from(TRACE_HEADER_SIZE);
        let draw_calls_offset = if draw_table.is_empty() {
            0
        } else {
            header_size
        };
        let resources_offset = if resource_table.is_empty() {
            0
        } else {
            header_size + draw_table.len() as u64
        };
        let total_size = header_size + draw_table.len() as u64 + resource_table.len() as u64;

        let header = TraceHeader {
            magic: TRACE_MAGIC,
            version: TRACE_VERSION,
            flags: 0,
            frame_number: self.frame_number,
            draw_call_count: self.draw_calls.len() as u32,
            resource_count: self.resources.len() as u32,
            backbuffer_width: self.backbuffer_width,
            backbuffer_height: self.backbuffer_height,
            state_offset: 0,
            draw_calls_offset,
            resources_offset,
            resource_data_offset: 0,
            reference_frame_offset: 0,
            total_size,
        };

        let mut out = encode_header(&header);
        out.extend_from_slice(&draw_table);
        out.extend_from_slice(&resource_table);
        out
    }
}
