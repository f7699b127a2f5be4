/// A trait that provides easy access to the first element of a slice.
pub trait Front<T> {
    fn front(&self) -> &T;
    fn mut_front(&mut self) -> &mut T;
}

/// A trait that provides easy access to the last element of a slice.
pub trait Back<T> {
    fn back(&self) -> &T;
}

impl<T> Front<T> for [T] {
    #[inline(always)]
    fn front(&self) -> &T {
        &self[0]
    }
    #[inline(always)]
    fn mut_front(&mut self) -> &mut T {
        &mut self[0]
    }
}

impl<T> Back<T> for [T] {
    #[inline(always)]
    fn back(&self) -> &T {
        &self[self.len() - 1]
    }
}

/// A trait to replace all elements in a container with zeros.
pub trait ZeroOut {
    fn zero_out(&mut self);
}

impl ZeroOut for f64 {
    fn zero_out(&mut self) {
        *self = 0.0;
    }
}

impl<T> ZeroOut for [T]
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        for elem in self {
            elem.zero_out();
        }
    }
}

impl<T> ZeroOut for Vec<T>
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        for elem in self {
            elem.zero_out();
        }
    }
}

/// Gets layer `layer` immutably and layer `layer + 1` mutably.
pub fn split_layers(
    layers: &mut [Vec<f64>],
    layer: usize,
) -> (&[f64], &mut [f64]) {
    let (before, after) = layers[layer..].split_at_mut(1);
    (&before[0], &mut after[0])
}

/// Gets layer `layer` mutably and layer `layer + 1` immutably.
pub fn split_layers_rev(
    layers: &mut [Vec<f64>],
    layer: usize,
) -> (&mut [f64], &[f64]) {
    let (before, after) = layers[layer..].split_at_mut(1);
    (&mut before[0], &after[0])
}

/// Returns the index of the largest value, scanning left to right and
/// keeping the first of equal maxima.
///
/// Values that never exceed `f64::MIN` (NaN, negative infinity) cannot win;
/// if no value does, index 0 is returned.
pub fn argmax(values: &[f64]) -> usize {
    let mut max = f64::MIN;
    let mut index = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > max {
            max = value;
            index = i;
        }
    }
    index
}
