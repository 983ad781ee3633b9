/// Anchor/focus pair describing a range within a block map.
///
/// Offsets count characters within the block named by the matching key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
    pub is_backward: bool,
    pub has_focus: bool,
}

impl SelectionState {
    /// Collapsed selection at the start of `key`
    pub fn create_empty(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            anchor_key: key.clone(),
            anchor_offset: 0,
            focus_key: key,
            focus_offset: 0,
            is_backward: false,
            has_focus: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> &str {
        if self.is_backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> &str {
        if self.is_backward {
            &self.anchor_key
        } else {
            &self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Whether the anchor or focus lies in `key` between `start` and `end`
    pub fn has_edge_within(&self, key: &str, start: usize, end: usize) -> bool {
        let within = |edge_key: &str, offset: usize| {
            edge_key == key && (start..=end).contains(&offset)
        };
        within(&self.anchor_key, self.anchor_offset) || within(&self.focus_key, self.focus_offset)
    }
}
