//! On-disk layout of a capture-trace file.
//!
//! The layout mirrors the instrumented driver's C structs, so the implicit
//! padding those structs carry is part of the format: the header has a
//! 4-byte alignment gap between its 32-bit field group and its first 64-bit
//! offset, and resource entries pad their type byte and tail out to a fixed
//! 56-byte stride. Decoders and encoders treat these gaps as explicit
//! skip/zero bytes rather than relying on any host struct layout.

use std::fmt;

use crate::topology::PrimitiveType;

/// ASCII "D3D9TRAC", read as a little-endian `u64`.
pub const TRACE_MAGIC: u64 = 0x4543_4152_5439_4433;

/// Current trace format version emitted by the writer.
pub const TRACE_VERSION: u32 = 1;

/// Encoded header size: magic (8) + seven u32 fields (28) + 4 bytes padding
/// + six u64 offsets/sizes (48).
pub const TRACE_HEADER_SIZE: u32 = 88;

/// Common prefix of every draw-call record: four discriminant/flag bytes
/// plus the u32 primitive count.
pub const DRAW_CALL_PREFIX_SIZE: u32 = 8;

/// Fixed stride of one resource-table entry, trailing padding included.
pub const RESOURCE_ENTRY_SIZE: u32 = 56;

/// Fixed-layout trace file header. Read once per file, immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceHeader {
    pub magic: u64,
    pub version: u32,
    pub flags: u32,
    pub frame_number: u32,
    pub draw_call_count: u32,
    pub resource_count: u32,
    pub backbuffer_width: u32,
    pub backbuffer_height: u32,
    pub state_offset: u64,
    pub draw_calls_offset: u64,
    pub resources_offset: u64,
    pub resource_data_offset: u64,
    pub reference_frame_offset: u64,
    pub total_size: u64,
}

/// Draw-call record discriminant (the record's first byte).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawCallKind {
    DrawPrimitive,
    DrawIndexedPrimitive,
    DrawPrimitiveUp,
    DrawIndexedPrimitiveUp,
}

impl DrawCallKind {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(DrawCallKind::DrawPrimitive),
            1 => Some(DrawCallKind::DrawIndexedPrimitive),
            2 => Some(DrawCallKind::DrawPrimitiveUp),
            3 => Some(DrawCallKind::DrawIndexedPrimitiveUp),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            DrawCallKind::DrawPrimitive => 0,
            DrawCallKind::DrawIndexedPrimitive => 1,
            DrawCallKind::DrawPrimitiveUp => 2,
            DrawCallKind::DrawIndexedPrimitiveUp => 3,
        }
    }

    /// User-pointer ("UP") draws carry their vertex/index data inline in the
    /// command stream instead of referencing a pre-uploaded buffer.
    pub fn is_user_pointer(self) -> bool {
        matches!(
            self,
            DrawCallKind::DrawPrimitiveUp | DrawCallKind::DrawIndexedPrimitiveUp
        )
    }
}

impl fmt::Display for DrawCallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrawCallKind::DrawPrimitive => "DrawPrimitive",
            DrawCallKind::DrawIndexedPrimitive => "DrawIndexedPrimitive",
            DrawCallKind::DrawPrimitiveUp => "DrawPrimitiveUP",
            DrawCallKind::DrawIndexedPrimitiveUp => "DrawIndexedPrimitiveUP",
        };
        f.write_str(s)
    }
}

/// One decoded draw-call record: the common prefix fields plus the
/// kind-specific arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub primitive_type: PrimitiveType,
    pub has_state_delta: bool,
    pub primitive_count: u32,
    pub args: DrawCallArgs,
}

impl DrawCall {
    pub fn kind(&self) -> DrawCallKind {
        self.args.kind()
    }

    /// Vertices consumed by this draw, derived from the primitive topology.
    pub fn vertex_count(&self) -> u64 {
        self.primitive_type.vertex_count(self.primitive_count)
    }
}

/// Kind-specific draw-call arguments. Fields that do not exist for a given
/// kind are not represented, so consumers can never mistake a default for
/// real data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCallArgs {
    /// Non-indexed draw from a bound vertex buffer.
    Direct { start_vertex: u32 },
    /// Indexed draw from bound vertex/index buffers.
    Indexed {
        base_vertex_index: i32,
        min_vertex_index: u32,
        num_vertices: u32,
        start_index: u32,
    },
    /// Non-indexed draw with the vertex data inlined in the stream.
    ///
    /// `vertex_data` is `Some` only when the decode opted into retaining
    /// inline payloads; the bytes are otherwise consumed and discarded.
    DirectUp {
        vertex_stride: u32,
        vertex_data_size: u32,
        vertex_data: Option<Vec<u8>>,
    },
    /// Indexed draw with both vertex and index data inlined in the stream.
    IndexedUp {
        min_vertex_index: u32,
        num_vertices: u32,
        vertex_stride: u32,
        index_format: u32,
        vertex_data_size: u32,
        index_data_size: u32,
        vertex_data: Option<Vec<u8>>,
        index_data: Option<Vec<u8>>,
    },
}

impl DrawCallArgs {
    pub fn kind(&self) -> DrawCallKind {
        match self {
            DrawCallArgs::Direct { .. } => DrawCallKind::DrawPrimitive,
            DrawCallArgs::Indexed { .. } => DrawCallKind::DrawIndexedPrimitive,
            DrawCallArgs::DirectUp { .. } => DrawCallKind::DrawPrimitiveUp,
            DrawCallArgs::IndexedUp { .. } => DrawCallKind::DrawIndexedPrimitiveUp,
        }
    }
}

/// Resource-table entry discriminant (byte 4 of the entry).
///
/// Unrecognized type codes are tolerated and carried through as
/// `Unknown(raw)`; the format may grow new resource kinds that an analyzer
/// need not reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    Texture2d,
    TextureCube,
    Texture3d,
    VertexBuffer,
    IndexBuffer,
    VertexShader,
    PixelShader,
    VertexDecl,
    Unknown(u8),
}

impl ResourceType {
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ResourceType::Texture2d,
            1 => ResourceType::TextureCube,
            2 => ResourceType::Texture3d,
            3 => ResourceType::VertexBuffer,
            4 => ResourceType::IndexBuffer,
            5 => ResourceType::VertexShader,
            6 => ResourceType::PixelShader,
            7 => ResourceType::VertexDecl,
            other => ResourceType::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ResourceType::Texture2d => 0,
            ResourceType::TextureCube => 1,
            ResourceType::Texture3d => 2,
            ResourceType::VertexBuffer => 3,
            ResourceType::IndexBuffer => 4,
            ResourceType::VertexShader => 5,
            ResourceType::PixelShader => 6,
            ResourceType::VertexDecl => 7,
            ResourceType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Texture2d => f.write_str("texture_2d"),
            ResourceType::TextureCube => f.write_str("texture_cube"),
            ResourceType::Texture3d => f.write_str("texture_3d"),
            ResourceType::VertexBuffer => f.write_str("vertex_buffer"),
            ResourceType::IndexBuffer => f.write_str("index_buffer"),
            ResourceType::VertexShader => f.write_str("vertex_shader"),
            ResourceType::PixelShader => f.write_str("pixel_shader"),
            ResourceType::VertexDecl => f.write_str("vertex_decl"),
            ResourceType::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

/// One decoded resource-table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    pub id: u32,
    pub kind: ResourceType,
    /// Offset of the backing data blob, relative to file start (0 = none).
    pub data_offset: u64,
    pub data_size: u64,
    pub desc: ResourceDesc,
}

/// Type-specific description decoded from the entry's 28-byte union region.
///
/// Entries whose type has no decoded union arm (cube/volume textures and
/// unknown types) carry `Opaque`; the raw union bytes are consumed but never
/// reinterpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceDesc {
    Texture2d {
        width: u32,
        height: u32,
        mip_levels: u32,
        format: u32,
    },
    VertexBuffer {
        size: u32,
        usage: u32,
        fvf: u32,
        pool: u32,
    },
    IndexBuffer {
        size: u32,
        usage: u32,
        format: u32,
        pool: u32,
    },
    Shader {
        bytecode_size: u32,
    },
    VertexDecl {
        element_count: u32,
    },
    Opaque,
}
