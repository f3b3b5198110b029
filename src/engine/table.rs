use super::NativeHandle;

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Manually managed storage for engine-side objects, addressed by
/// [`NativeHandle`]. Freed slots are reused with a bumped generation so a
/// stale handle never reaches the new occupant.
#[derive(Debug)]
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Returns `None` once the slot index space is exhausted.
    pub fn insert(&mut self, value: T) -> Option<NativeHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            self.live += 1;
            return Some(NativeHandle::new(index, slot.generation));
        }

        let index = u32::try_from(self.slots.len()).ok()?;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.live += 1;
        Some(NativeHandle::new(index, 0))
    }

    pub fn get(&self, handle: NativeHandle) -> Option<&T> {
        let slot = self.slots.get(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn remove(&mut self, handle: NativeHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot());
        self.live -= 1;
        Some(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }
}
