use thiserror::Error;

/// Failures of the object-descriptor resolution path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Object index {index} out of range (object count: {count})")]
    ObjectOutOfRange { index: u32, count: u32 },

    #[error("Element {index} out of range in buffer '{label}' (count: {count})")]
    ElementOutOfRange {
        label: String,
        index: u32,
        count: u32,
    },

    #[error("Buffer handle {0} does not belong to this arena")]
    UnknownBuffer(u32),

    #[error("Stride {stride} is smaller than the element size {element_size}")]
    StrideTooSmall { stride: u32, element_size: u32 },

    #[error("Buffer '{label}' holds {available} bytes, the view needs {required}")]
    Truncated {
        label: String,
        required: u64,
        available: u64,
    },

    #[error("Triangle {triangle} has negative material index {material_index}")]
    NegativeMaterialIndex { triangle: u32, material_index: i32 },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
