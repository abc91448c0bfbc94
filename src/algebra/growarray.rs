/// Growable scratch buffer.
///
/// A `GrowArray` owns a buffer that is enlarged on demand and never
/// implicitly shrunk, so that repeated solves against matrices of the
/// same dimension allocate only once.  The logical length is set by
/// [`reshape`](GrowArray::reshape) and may be smaller than the capacity.
#[derive(Debug, Clone, Default)]
pub struct GrowArray<T> {
    data: Vec<T>,
    length: usize,
    reallocations: usize,
}

impl<T> GrowArray<T>
where
    T: Copy + Default,
{
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            length: 0,
            reallocations: 0,
        }
    }

    /// Allocates an array with an initial logical length
    pub fn with_length(length: usize) -> Self {
        let mut arr = Self::new();
        arr.reshape(length);
        arr
    }

    /// Sets the logical length, growing the backing buffer if required.
    /// Existing contents are not preserved across a reallocation.
    pub fn reshape(&mut self, length: usize) {
        if self.data.len() < length {
            self.data = vec![T::default(); length];
            self.reallocations += 1;
        }
        self.length = length;
    }

    /// Reshapes to `length` and returns the zero-filled active region
    pub fn adjust(&mut self, length: usize) -> &mut [T] {
        self.reshape(length);
        let active = &mut self.data[..length];
        active.fill(T::default());
        active
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// size of the backing buffer
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// number of times the backing buffer has been (re)allocated
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    pub fn data(&self) -> &[T] {
        &self.data[..self.length]
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data[..self.length]
    }
}

#[test]
fn test_growarray_never_shrinks() {
    let mut a = GrowArray::<f64>::new();
    a.reshape(10);
    assert_eq!(a.len(), 10);
    assert_eq!(a.capacity(), 10);
    assert_eq!(a.reallocations(), 1);

    a.reshape(4);
    assert_eq!(a.len(), 4);
    assert_eq!(a.capacity(), 10);
    assert_eq!(a.data().len(), 4);

    a.reshape(10);
    assert_eq!(a.reallocations(), 1);

    a.reshape(11);
    assert_eq!(a.reallocations(), 2);
    assert_eq!(a.capacity(), 11);
}

#[test]
fn test_growarray_adjust_zeroes() {
    let mut a = GrowArray::<usize>::with_length(3);
    a.data_mut().copy_from_slice(&[1, 2, 3]);
    let v = a.adjust(2);
    assert_eq!(v, &[0, 0]);
}
