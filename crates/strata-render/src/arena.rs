use crate::error::{
    ResolveError,
    Result,
};
use bytemuck::Pod;
use std::marker::PhantomData;

/// Opaque index of a buffer inside a [`BufferArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u32);

impl BufferHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Typed window `(handle, stride, count)` over an arena buffer.
pub struct BufferView<T> {
    handle: BufferHandle,
    stride: u32,
    count: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for BufferView<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BufferView<T> {}

impl<T> PartialEq for BufferView<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && self.stride == other.stride && self.count == other.count
    }
}

impl<T> Eq for BufferView<T> {}

impl<T> std::fmt::Debug for BufferView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferView")
            .field("element", &std::any::type_name::<T>())
            .field("handle", &self.handle)
            .field("stride", &self.stride)
            .field("count", &self.count)
            .finish()
    }
}

impl<T> BufferView<T> {
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn byte_len(&self) -> u64 {
        self.stride as u64 * self.count as u64
    }
}

#[derive(Debug, Clone)]
struct ArenaBuffer {
    label: String,
    bytes: Vec<u8>,
}

/// Owner of every per-object array. Views into it replace raw device addresses on the host.
#[derive(Debug, Clone, Default)]
pub struct BufferArena {
    buffers: Vec<ArenaBuffer>,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Stores externally packed bytes; use [`BufferArena::view`] to read them back typed.
    pub fn upload_bytes(&mut self, label: &str, bytes: &[u8]) -> BufferHandle {
        let handle = BufferHandle(self.buffers.len() as u32);
        log::debug!("arena: '{}' -> {:?} ({} bytes)", label, handle, bytes.len());
        self.buffers.push(ArenaBuffer {
            label: label.to_owned(),
            bytes: bytes.to_vec(),
        });
        handle
    }

    /// Stores a densely packed array of `T`.
    pub fn upload<T: Pod>(&mut self, label: &str, data: &[T]) -> BufferView<T> {
        let handle = self.upload_bytes(label, bytemuck::cast_slice(data));
        BufferView {
            handle,
            stride: std::mem::size_of::<T>() as u32,
            count: data.len() as u32,
            _marker: PhantomData,
        }
    }

    /// Typed view over an existing buffer, validated against the buffer's size.
    pub fn view<T: Pod>(
        &self,
        handle: BufferHandle,
        stride: u32,
        count: u32,
    ) -> Result<BufferView<T>> {
        let element_size = std::mem::size_of::<T>() as u32;
        if stride < element_size {
            return Err(ResolveError::StrideTooSmall {
                stride,
                element_size,
            });
        }
        let buffer = self.buffer(handle)?;
        // the last element only needs its own size, not a full stride
        let required = match count {
            0 => 0,
            n => (n as u64 - 1) * stride as u64 + element_size as u64,
        };
        if required > buffer.bytes.len() as u64 {
            return Err(ResolveError::Truncated {
                label: buffer.label.clone(),
                required,
                available: buffer.bytes.len() as u64,
            });
        }
        Ok(BufferView {
            handle,
            stride,
            count,
            _marker: PhantomData,
        })
    }

    /// Reads element `index` of `view`, refusing anything outside the view.
    pub fn load<T: Pod>(&self, view: BufferView<T>, index: u32) -> Result<T> {
        let buffer = self.buffer(view.handle)?;
        if index >= view.count {
            return Err(ResolveError::ElementOutOfRange {
                label: buffer.label.clone(),
                index,
                count: view.count,
            });
        }
        let start = index as usize * view.stride as usize;
        let end = start + std::mem::size_of::<T>();
        let bytes = buffer
            .bytes
            .get(start..end)
            .ok_or_else(|| ResolveError::Truncated {
                label: buffer.label.clone(),
                required: end as u64,
                available: buffer.bytes.len() as u64,
            })?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    pub fn buffers(&self) -> impl Iterator<Item = (BufferHandle, &str, &[u8])> {
        self.buffers.iter().enumerate().map(|(i, buffer)| {
            (
                BufferHandle(i as u32),
                buffer.label.as_str(),
                buffer.bytes.as_slice(),
            )
        })
    }

    fn buffer(&self, handle: BufferHandle) -> Result<&ArenaBuffer> {
        self.buffers
            .get(handle.0 as usize)
            .ok_or(ResolveError::UnknownBuffer(handle.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_and_load() {
        let mut arena = BufferArena::new();
        let view = arena.upload("values", &[10u32, 20, 30]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.stride(), 4);
        assert_eq!(arena.load(view, 0).unwrap(), 10);
        assert_eq!(arena.load(view, 2).unwrap(), 30);
    }

    #[test]
    fn test_load_past_the_end_is_an_error() {
        let mut arena = BufferArena::new();
        let view = arena.upload("values", &[1.0f32, 2.0]);
        assert_eq!(
            arena.load(view, 2),
            Err(ResolveError::ElementOutOfRange {
                label: "values".to_owned(),
                index: 2,
                count: 2,
            })
        );
    }

    #[test]
    fn test_strided_view_over_interleaved_bytes() {
        // (u32 value, u32 ignored) pairs
        let words = [7u32, 0xdead, 8, 0xbeef, 9, 0xf00d];
        let mut arena = BufferArena::new();
        let handle = arena.upload_bytes("pairs", bytemuck::cast_slice(&words));

        let view = arena.view::<u32>(handle, 8, 3).unwrap();
        assert_eq!(arena.load(view, 1).unwrap(), 8);
        assert_eq!(arena.load(view, 2).unwrap(), 9);
    }

    #[test]
    fn test_view_validation() {
        let mut arena = BufferArena::new();
        let handle = arena.upload_bytes("small", &[0u8; 16]);

        assert_eq!(
            arena.view::<u64>(handle, 4, 1),
            Err(ResolveError::StrideTooSmall {
                stride: 4,
                element_size: 8,
            })
        );
        assert!(matches!(
            arena.view::<u64>(handle, 8, 3),
            Err(ResolveError::Truncated { required: 24, .. })
        ));
        assert!(arena.view::<u64>(handle, 8, 2).is_ok());
    }

    #[test]
    fn test_view_from_another_arena_is_rejected() {
        let mut other = BufferArena::new();
        other.upload("a", &[0u32]);
        let foreign = other.upload("b", &[1u32]);

        let mut arena = BufferArena::new();
        arena.upload("only", &[2u32]);
        assert_eq!(arena.load(foreign, 0), Err(ResolveError::UnknownBuffer(1)));
    }
}
