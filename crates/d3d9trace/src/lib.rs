#![forbid(unsafe_code)]

//! D3D9 capture-trace container.
//!
//! A trace file records one rendered frame: a fixed header, a table of
//! variable-size draw-call records, a table of fixed-size resource entries,
//! and blobs of backing resource data. All integers are little-endian;
//! offsets are relative to the start of the file, with `0` meaning "section
//! absent".
//!
//! The reader tolerates truncated tables (incomplete captures decode to a
//! partial result); structural corruption such as an unknown draw-call
//! discriminant aborts only the phase it was found in. The writer is a pure
//! fixture/producer API that returns fully formed bytes so callers can decide
//! how to persist them.

mod cursor;
mod error;
mod format;
mod reader;
mod topology;
mod writer;

pub use cursor::ByteCursor;
pub use error::{Result, TraceReadError};
pub use format::{
    DrawCall, DrawCallArgs, DrawCallKind, ResourceDesc, ResourceEntry, ResourceType, TraceHeader,
    DRAW_CALL_PREFIX_SIZE, RESOURCE_ENTRY_SIZE, TRACE_HEADER_SIZE, TRACE_MAGIC, TRACE_VERSION,
};
pub use reader::{
    decode_file, decode_frame, read_draw_call, read_header, read_resource_entry, DecodeOptions,
    TraceFrame,
};
pub use topology::PrimitiveType;
pub use writer::{encode_draw_call, encode_header, encode_resource_entry, TraceWriter};
