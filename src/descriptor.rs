//! Queue descriptor registry (§4.9): a name-keyed table the harness walks
//! to build every algorithm in the matrix through one uniform interface,
//! rather than hand-wiring each concrete type into the test/bench drivers.

use crate::batched::{BatchedMpsc, BatchedSpsc};
use crate::blocking_ring::BlockingMpmc;
use crate::bounded::{Mpmc, Mpsc, PaddedMpmc, PaddedMpsc, PaddedSpmc, PaddedSpsc, Spmc, Spsc};
use crate::capability::{Capability, Capable};
use crate::channel_mpmc::ChannelMpmc;
use crate::error::{QueueError, Result};
use crate::unbounded_mpsc::UnboundedMpsc;
use crate::unbounded_mpsc_intrusive::IntrusiveMpsc;
use crate::unbounded_spsc::UnboundedSpsc;

/// The constructor parameters a named algorithm expects, mirroring the
/// source's ad-hoc per-benchmark argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    /// Takes neither a batch size nor a ring size (unbounded algorithms).
    None,
    /// Takes only a ring size.
    Size,
    /// Takes only a batch size. No registered algorithm currently needs
    /// this shape without also taking a ring size; kept so the registry's
    /// shape enum matches the full matrix named in §4.9.
    BatchSize,
    /// Takes both a batch size and a ring size (MCRingBuffer-style rings).
    BatchSizeAndSize,
}

/// Type-erased access to any queue in the matrix, fixed to `i64` per the
/// data model's "opaque, copyable, defaultable" element type.
pub trait DynQueue: Send + Sync {
    fn try_send(&self, value: i64) -> bool;
    fn try_recv(&self) -> Option<i64>;
    fn capability(&self) -> Capability;
    fn capacity(&self) -> Option<usize> {
        None
    }
}

macro_rules! impl_dyn_queue_bounded {
    ($ty:ty) => {
        impl DynQueue for $ty {
            fn try_send(&self, value: i64) -> bool {
                Self::try_send(self, value)
            }
            fn try_recv(&self) -> Option<i64> {
                Self::try_recv(self)
            }
            fn capability(&self) -> Capability {
                <Self as Capable>::CAPABILITY
            }
            fn capacity(&self) -> Option<usize> {
                Some(Self::capacity(self))
            }
        }
    };
}

impl_dyn_queue_bounded!(Spsc<i64>);
impl_dyn_queue_bounded!(Mpsc<i64>);
impl_dyn_queue_bounded!(Spmc<i64>);
impl_dyn_queue_bounded!(Mpmc<i64>);
impl_dyn_queue_bounded!(PaddedSpsc<i64>);
impl_dyn_queue_bounded!(PaddedMpsc<i64>);
impl_dyn_queue_bounded!(PaddedSpmc<i64>);
impl_dyn_queue_bounded!(PaddedMpmc<i64>);
impl_dyn_queue_bounded!(BatchedSpsc<i64>);
impl_dyn_queue_bounded!(BatchedMpsc<i64>);
impl_dyn_queue_bounded!(BlockingMpmc<i64>);

impl DynQueue for UnboundedMpsc<i64> {
    fn try_send(&self, value: i64) -> bool {
        self.send(value);
        true
    }
    fn try_recv(&self) -> Option<i64> {
        Self::try_recv(self)
    }
    fn capability(&self) -> Capability {
        <Self as Capable>::CAPABILITY
    }
}

impl DynQueue for IntrusiveMpsc<i64> {
    fn try_send(&self, value: i64) -> bool {
        self.send(value);
        true
    }
    fn try_recv(&self) -> Option<i64> {
        Self::try_recv(self)
    }
    fn capability(&self) -> Capability {
        <Self as Capable>::CAPABILITY
    }
}

impl DynQueue for UnboundedSpsc<i64> {
    fn try_send(&self, value: i64) -> bool {
        self.send(value);
        true
    }
    fn try_recv(&self) -> Option<i64> {
        Self::try_recv(self)
    }
    fn capability(&self) -> Capability {
        <Self as Capable>::CAPABILITY
    }
}

impl DynQueue for ChannelMpmc<i64> {
    fn try_send(&self, value: i64) -> bool {
        Self::try_send(self, value)
    }
    fn try_recv(&self) -> Option<i64> {
        Self::try_recv(self)
    }
    fn capability(&self) -> Capability {
        <Self as Capable>::CAPABILITY
    }
    fn capacity(&self) -> Option<usize> {
        Some(Self::capacity(self))
    }
}

/// One row of the registry: a name, its constructor argument shape, and
/// the constructor itself.
pub struct Descriptor {
    pub name: &'static str,
    pub params: ParamShape,
    build: fn(batch_size: usize, size: usize) -> Box<dyn DynQueue>,
}

impl Descriptor {
    const fn new(
        name: &'static str,
        params: ParamShape,
        build: fn(usize, usize) -> Box<dyn DynQueue>,
    ) -> Self {
        Self {
            name,
            params,
            build,
        }
    }
}

pub const REGISTRY: &[Descriptor] = &[
    Descriptor::new("spsc", ParamShape::Size, |_, size| {
        Box::new(Spsc::<i64>::new(size))
    }),
    Descriptor::new("mpsc", ParamShape::Size, |_, size| {
        Box::new(Mpsc::<i64>::new(size))
    }),
    Descriptor::new("spmc", ParamShape::Size, |_, size| {
        Box::new(Spmc::<i64>::new(size))
    }),
    Descriptor::new("mpmc", ParamShape::Size, |_, size| {
        Box::new(Mpmc::<i64>::new(size))
    }),
    Descriptor::new("padded_spsc", ParamShape::Size, |_, size| {
        Box::new(PaddedSpsc::<i64>::new(size))
    }),
    Descriptor::new("padded_mpsc", ParamShape::Size, |_, size| {
        Box::new(PaddedMpsc::<i64>::new(size))
    }),
    Descriptor::new("padded_spmc", ParamShape::Size, |_, size| {
        Box::new(PaddedSpmc::<i64>::new(size))
    }),
    Descriptor::new("padded_mpmc", ParamShape::Size, |_, size| {
        Box::new(PaddedMpmc::<i64>::new(size))
    }),
    Descriptor::new("unbounded_mpsc", ParamShape::None, |_, _| {
        Box::new(UnboundedMpsc::<i64>::new())
    }),
    Descriptor::new("unbounded_mpsc_intrusive", ParamShape::None, |_, _| {
        Box::new(IntrusiveMpsc::<i64>::new())
    }),
    Descriptor::new("unbounded_spsc", ParamShape::None, |_, _| {
        Box::new(UnboundedSpsc::<i64>::new())
    }),
    Descriptor::new("batched_spsc", ParamShape::BatchSizeAndSize, |batch, size| {
        Box::new(BatchedSpsc::<i64>::new(batch, size))
    }),
    Descriptor::new("batched_mpsc", ParamShape::BatchSizeAndSize, |batch, size| {
        Box::new(BatchedMpsc::<i64>::new(batch, size))
    }),
    Descriptor::new("blocking_mpmc", ParamShape::Size, |_, size| {
        Box::new(BlockingMpmc::<i64>::new(size))
    }),
    Descriptor::new("channel_mpmc", ParamShape::Size, |_, size| {
        Box::new(ChannelMpmc::<i64>::new(size))
    }),
];

pub fn find(name: &str) -> Option<&'static Descriptor> {
    REGISTRY.iter().find(|d| d.name == name)
}

/// Build a named queue, validating that `batch_size`/`size` make sense
/// against its [`ParamShape`] before constructing it.
pub fn create(name: &str, batch_size: usize, size: usize) -> Result<Box<dyn DynQueue>> {
    let descriptor = find(name).ok_or_else(|| {
        QueueError::config(format!("no queue registered under the name '{name}'"))
    })?;

    match descriptor.params {
        ParamShape::Size | ParamShape::BatchSizeAndSize if size == 0 => {
            return Err(QueueError::config(format!(
                "'{name}' requires a nonzero ring size"
            )))
        }
        ParamShape::BatchSize | ParamShape::BatchSizeAndSize if batch_size == 0 => {
            return Err(QueueError::config(format!(
                "'{name}' requires a nonzero batch size"
            )))
        }
        _ => {}
    }

    Ok((descriptor.build)(batch_size, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_every_entry() {
        for descriptor in REGISTRY {
            let q = create(descriptor.name, 4, 16).unwrap();
            assert!(q.try_send(1));
            assert_eq!(q.try_recv(), Some(1));
        }
    }

    #[test]
    fn rejects_zero_size_for_sized_shapes() {
        assert!(create("spsc", 0, 0).is_err());
        assert!(create("batched_spsc", 0, 16).is_err());
    }

    #[test]
    fn rejects_unknown_name() {
        assert!(create("not-a-real-queue", 1, 1).is_err());
    }
}
