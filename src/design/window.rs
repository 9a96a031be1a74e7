/// Residue span proposed together, of which the first `commit` residues are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    /// End of the in-scope residues
    pub scope_end: usize,
    /// End of the lookahead (exclusive)
    pub end: usize,
    pub commit: usize,
}

/// Sliding windows over residues `start .. len`.
///
/// Each window holds `in_scope` residues followed by up to `lookahead`
/// residues, clipped to the peptide end; windows advance by `step`.
#[derive(Debug, Clone)]
pub struct Windows {
    pos: usize,
    len: usize,
    in_scope: usize,
    lookahead: usize,
    step: usize,
}

impl Windows {
    pub fn new(start: usize, len: usize, in_scope: usize, lookahead: usize, step: usize) -> Windows {
        Windows { pos: start, len, in_scope: in_scope.max(1), lookahead, step: step.max(1) }
    }
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.pos >= self.len {
            return None;
        }
        let start = self.pos;
        let scope_end = (start + self.in_scope).min(self.len);
        let end = (scope_end + self.lookahead).min(self.len);
        let commit = self.step.min(self.len - start);
        self.pos += commit;
        Some(Window { start, scope_end, end, commit })
    }
}
