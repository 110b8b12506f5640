// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex attribute layout.

/// Widest vertex layout, in floats per vertex, that every target GPU renders correctly.
pub const MAX_VERTEX_SLOTS: usize = 16;

/// Width of one attribute, stored as `components - 1`.
///
/// Offsets into an attribute array are always `(size + 1) * vertex`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttributeSize {
    /// One float per vertex.
    One = 0,
    /// Two floats per vertex.
    Two = 1,
    /// Three floats per vertex.
    Three = 2,
    /// Four floats per vertex.
    Four = 3,
}

impl AttributeSize {
    /// Encoded size, `0..=3`.
    pub const fn encoded(self) -> u8 {
        self as u8
    }

    /// Decode `0..=3`.
    pub const fn from_encoded(size: u8) -> Option<Self> {
        match size {
            0 => Some(Self::One),
            1 => Some(Self::Two),
            2 => Some(Self::Three),
            3 => Some(Self::Four),
            _ => None,
        }
    }

    /// Floats per vertex.
    pub const fn components(self) -> usize {
        self as usize + 1
    }
}

/// One named per-vertex channel and the value every vertex starts with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttributeSpec {
    /// Name the host binds the array under.
    pub name: &'static str,
    /// Width of the attribute.
    pub size: AttributeSize,
    /// Initial value; only the first `size.components()` entries are used.
    pub defaults: [f32; 4],
}

impl AttributeSpec {
    /// Attribute initialized to zero.
    pub const fn new(name: &'static str, size: AttributeSize) -> Self {
        Self {
            name,
            size,
            defaults: [0.0; 4],
        }
    }

    /// Replace the initial value.
    pub const fn with_defaults(mut self, defaults: [f32; 4]) -> Self {
        self.defaults = defaults;
        self
    }

    pub(crate) fn default_vertex(&self) -> &[f32] {
        &self.defaults[..self.size.components()]
    }
}

/// Floats per vertex across a whole layout.
pub fn layout_width(specs: &[AttributeSpec]) -> usize {
    specs.iter().map(|s| s.size.components()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_encoding_round_trips() {
        for size in [
            AttributeSize::One,
            AttributeSize::Two,
            AttributeSize::Three,
            AttributeSize::Four,
        ] {
            assert_eq!(AttributeSize::from_encoded(size.encoded()), Some(size));
            assert_eq!(size.components(), usize::from(size.encoded()) + 1);
        }
        assert_eq!(AttributeSize::from_encoded(4), None);
    }

    #[test]
    fn defaults_are_truncated_to_width() {
        let spec =
            AttributeSpec::new("uv", AttributeSize::Two).with_defaults([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(spec.default_vertex(), &[1.0, 2.0]);
        assert_eq!(layout_width(&[spec, spec]), 4);
    }
}
