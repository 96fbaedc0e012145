// Array-backed ranked trie.
//
// Every node carries the maximum score found in its subtree. A top-K query
// walks the subtree under the prefix in alphabetical pre-order and skips any
// subtree whose maximum cannot beat the current K-th best result, so typical
// queries touch a small fraction of the subtree.
//
// Insertion only ever raises scores (re-insertion keeps the maximum), so the
// per-node maxima stay valid without recomputation. Lowering a score with
// `set_score` recomputes the maxima along the word's path.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};
use vorschlag_core::character::folded_chars;

use crate::format::{self, Fingerprint, ImageHeader, NODES_OFFSET, VERSION};
use crate::node::{NO_SCORE, NONE, PackedNode};
use crate::{IndexError, RankedIndex};

/// Ranked prefix index over a packed node table.
///
/// # Example
///
/// ```
/// use vorschlag_index::{PackedTrie, RankedIndex};
///
/// let mut trie = PackedTrie::new();
/// trie.insert_word("Hallo", 3.0);
/// trie.insert_word("Haus", 5.0);
/// trie.insert_word("Baum", 9.0);
///
/// assert_eq!(trie.search_ranked("ha", 10), vec!["Haus", "Hallo"]);
/// ```
#[derive(Debug)]
pub struct PackedTrie {
    nodes: Vec<PackedNode>,
    words: Vec<String>,
    fingerprint: u64,
    available: AtomicBool,
}

impl PackedTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![PackedNode::root()],
            words: Vec::new(),
            fingerprint: 0,
            available: AtomicBool::new(true),
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Fingerprint of the resources this index was built from (0 if unset).
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn set_fingerprint(&mut self, fingerprint: u64) {
        self.fingerprint = fingerprint;
    }

    /// Permanently take this index out of service.
    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Relaxed);
    }

    /// Score currently stored for `word`, if present.
    pub fn score_of(&self, word: &str) -> Option<f64> {
        let idx = self.locate(word).ok().flatten()?;
        let node = self.nodes.get(idx as usize)?;
        node.is_terminal().then_some(node.score)
    }

    /// Insert a word, reporting structural failures instead of swallowing
    /// them.
    pub fn try_insert(&mut self, word: &str, score: f64) -> Result<(), IndexError> {
        let score = if score.is_nan() { NO_SCORE } else { score };
        let mut current = 0u32;
        let mut depth = 0usize;
        raise(&mut self.nodes[0], score);
        for c in folded_chars(word) {
            current = self.child_or_insert(current, c)?;
            raise(&mut self.nodes[current as usize], score);
            depth += 1;
        }
        if depth == 0 {
            return Ok(());
        }

        let node = &mut self.nodes[current as usize];
        if node.is_terminal() {
            if score > node.score {
                node.score = score;
            }
        } else {
            let word_index = u32::try_from(self.words.len())
                .map_err(|_| IndexError::CapacityExceeded(self.words.len()))?;
            node.word = word_index;
            node.score = score;
            self.words.push(word.to_string());
        }
        Ok(())
    }

    /// Replace the score of a stored word, lowering it if needed, and
    /// recompute the subtree maxima on its path. Returns `Ok(false)` if the
    /// word is not present.
    pub fn try_set_score(&mut self, word: &str, score: f64) -> Result<bool, IndexError> {
        let score = if score.is_nan() { NO_SCORE } else { score };
        let mut path = vec![0u32];
        let mut current = 0u32;
        for c in folded_chars(word) {
            let label = c as u32;
            let mut child = self.node(current)?.first_child;
            loop {
                if child == NONE {
                    return Ok(false);
                }
                let node = self.node(child)?;
                if node.label == label {
                    break;
                }
                if node.label > label {
                    return Ok(false);
                }
                child = node.next_sibling;
            }
            current = child;
            path.push(current);
        }
        if path.len() == 1 || !self.node(current)?.is_terminal() {
            return Ok(false);
        }

        self.nodes[current as usize].score = score;
        for &idx in path.iter().rev() {
            let max = self.subtree_max(idx)?;
            self.nodes[idx as usize].max_score = max;
        }
        Ok(true)
    }

    /// Like [`try_set_score`](Self::try_set_score), marking the index
    /// unavailable on a structural failure.
    pub fn set_score(&mut self, word: &str, score: f64) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.try_set_score(word, score) {
            warn!(error = %e, word, "packed index score update failed, marking unavailable");
            self.mark_unavailable();
        }
    }

    /// The larger of a node's own score and its children's maxima.
    fn subtree_max(&self, idx: u32) -> Result<f64, IndexError> {
        let node = self.node(idx)?;
        let mut max = if node.is_terminal() { node.score } else { NO_SCORE };
        let mut child = node.first_child;
        let mut steps = 0usize;
        while child != NONE {
            steps += 1;
            if steps > self.nodes.len() {
                return Err(IndexError::Corrupt(format!("sibling cycle under node {idx}")));
            }
            let c = self.node(child)?;
            if c.max_score > max {
                max = c.max_score;
            }
            child = c.next_sibling;
        }
        Ok(max)
    }

    /// Find the child of `parent` labelled `c`, inserting it at its sorted
    /// position in the sibling chain if missing.
    fn child_or_insert(&mut self, parent: u32, c: char) -> Result<u32, IndexError> {
        let label = c as u32;
        let mut prev = NONE;
        let mut cur = self.nodes[parent as usize].first_child;
        while cur != NONE {
            let node = &self.nodes[cur as usize];
            if node.label == label {
                return Ok(cur);
            }
            if node.label > label {
                break;
            }
            prev = cur;
            cur = node.next_sibling;
        }

        if self.nodes.len() >= NONE as usize {
            return Err(IndexError::CapacityExceeded(self.nodes.len()));
        }
        let idx = self.nodes.len() as u32;
        let mut node = PackedNode::new(c);
        node.next_sibling = cur;
        self.nodes.push(node);
        if prev == NONE {
            self.nodes[parent as usize].first_child = idx;
        } else {
            self.nodes[prev as usize].next_sibling = idx;
        }
        Ok(idx)
    }

    fn node(&self, idx: u32) -> Result<&PackedNode, IndexError> {
        self.nodes
            .get(idx as usize)
            .ok_or_else(|| IndexError::Corrupt(format!("node reference {idx} out of range")))
    }

    /// Walk down to the node for `prefix`. `Ok(None)` means no entry has
    /// this prefix.
    fn locate(&self, prefix: &str) -> Result<Option<u32>, IndexError> {
        let mut current = 0u32;
        for c in folded_chars(prefix) {
            let label = c as u32;
            let mut child = self.node(current)?.first_child;
            loop {
                if child == NONE {
                    return Ok(None);
                }
                let node = self.node(child)?;
                if node.label == label {
                    break;
                }
                if node.label > label {
                    return Ok(None);
                }
                child = node.next_sibling;
            }
            current = child;
        }
        Ok(Some(current))
    }

    /// Top-K search with subtree pruning.
    pub fn try_search(
        &self,
        prefix: &str,
        max_results: usize,
    ) -> Result<Vec<(String, f64)>, IndexError> {
        if max_results == 0 {
            return Ok(Vec::new());
        }
        let Some(start) = self.locate(prefix)? else {
            return Ok(Vec::new());
        };

        // (score, word index), sorted by descending score; equal scores keep
        // traversal order
        let mut top: Vec<(f64, u32)> = Vec::with_capacity(max_results + 1);
        let mut stack = vec![start];
        let mut visited = 0usize;

        while let Some(idx) = stack.pop() {
            visited += 1;
            if visited > self.nodes.len() {
                return Err(IndexError::Corrupt("cycle in node table".into()));
            }
            let node = self.node(idx)?;
            if idx != start && node.next_sibling != NONE {
                stack.push(node.next_sibling);
            }
            let full = top.len() == max_results;
            if full && node.max_score <= top[max_results - 1].0 {
                continue;
            }
            if node.is_terminal() && (!full || node.score > top[max_results - 1].0) {
                let pos = top.partition_point(|&(s, _)| s >= node.score);
                top.insert(pos, (node.score, node.word));
                top.truncate(max_results);
            }
            if node.first_child != NONE {
                stack.push(node.first_child);
            }
        }
        debug!(prefix, visited, found = top.len(), "packed search");

        top.into_iter()
            .map(|(score, w)| {
                self.words
                    .get(w as usize)
                    .map(|word| (word.clone(), score))
                    .ok_or_else(|| IndexError::Corrupt(format!("word reference {w} out of range")))
            })
            .collect()
    }

    // =========================================================================
    // Index image
    // =========================================================================

    /// Serialize the index to its binary image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = ImageHeader {
            version: VERSION,
            node_count: self.nodes.len() as u32,
            word_count: self.words.len() as u32,
        };
        let node_bytes: &[u8] = bytemuck::cast_slice(&self.nodes);
        let word_bytes: usize = self.words.iter().map(|w| 4 + w.len()).sum();

        let mut out = Vec::with_capacity(NODES_OFFSET + node_bytes.len() + word_bytes);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&self.fingerprint.to_le_bytes());
        out.extend_from_slice(node_bytes);
        for word in &self.words {
            out.extend_from_slice(&(word.len() as u32).to_le_bytes());
            out.extend_from_slice(word.as_bytes());
        }
        out
    }

    /// Load an index from its binary image, validating every reference.
    pub fn from_bytes(data: &[u8]) -> Result<Self, IndexError> {
        let header = format::parse_header(data)?;
        let node_count = header.node_count as usize;
        let node_size = size_of::<PackedNode>();
        let nodes_end = node_count
            .checked_mul(node_size)
            .and_then(|n| n.checked_add(NODES_OFFSET))
            .ok_or_else(|| IndexError::Corrupt("node count overflows".into()))?;
        if data.len() < nodes_end {
            return Err(IndexError::TooShort {
                expected: nodes_end,
                actual: data.len(),
            });
        }

        let mut fp = [0u8; 8];
        fp.copy_from_slice(&data[format::HEADER_SIZE..NODES_OFFSET]);
        let fingerprint = u64::from_le_bytes(fp);

        // Copy into an aligned Vec; the source slice may not be 8-byte aligned.
        let mut nodes = vec![PackedNode::root(); node_count];
        bytemuck::cast_slice_mut::<PackedNode, u8>(&mut nodes)
            .copy_from_slice(&data[NODES_OFFSET..nodes_end]);

        let mut words = Vec::with_capacity(header.word_count as usize);
        let mut pos = nodes_end;
        for _ in 0..header.word_count {
            if pos + 4 > data.len() {
                return Err(IndexError::TooShort {
                    expected: pos + 4,
                    actual: data.len(),
                });
            }
            let len = format::read_u32(data, pos) as usize;
            pos += 4;
            let end = pos
                .checked_add(len)
                .filter(|&e| e <= data.len())
                .ok_or(IndexError::TooShort {
                    expected: pos.saturating_add(len),
                    actual: data.len(),
                })?;
            let word = std::str::from_utf8(&data[pos..end])
                .map_err(|e| IndexError::Corrupt(format!("word table: {e}")))?;
            words.push(word.to_string());
            pos = end;
        }
        if pos != data.len() {
            return Err(IndexError::Corrupt(format!(
                "{} trailing bytes after word table",
                data.len() - pos
            )));
        }

        validate(&nodes, words.len())?;
        Ok(Self {
            nodes,
            words,
            fingerprint,
            available: AtomicBool::new(true),
        })
    }
}

impl Default for PackedTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl RankedIndex for PackedTrie {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    fn insert_word(&mut self, word: &str, score: f64) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.try_insert(word, score) {
            warn!(error = %e, word, "packed index insertion failed, marking unavailable");
            self.mark_unavailable();
        }
    }

    fn search_scored(&self, prefix: &str, max_results: usize) -> Vec<(String, f64)> {
        if !self.is_available() {
            return Vec::new();
        }
        match self.try_search(prefix, max_results) {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, prefix, "packed index is inconsistent, marking unavailable");
                self.mark_unavailable();
                Vec::new()
            }
        }
    }
}

#[inline]
fn raise(node: &mut PackedNode, score: f64) {
    if score > node.max_score {
        node.max_score = score;
    }
}

/// Check that a loaded node table is a well-formed tree: every reference in
/// range, every non-root node referenced exactly once, siblings in strictly
/// ascending label order, labels valid characters and subtree maxima
/// consistent with the scores below them.
fn validate(nodes: &[PackedNode], word_count: usize) -> Result<(), IndexError> {
    if nodes.is_empty() {
        return Err(IndexError::Corrupt("missing root node".into()));
    }
    let n = nodes.len();
    let mut in_degree = vec![0u8; n];
    for (i, node) in nodes.iter().enumerate() {
        for target in [node.first_child, node.next_sibling] {
            if target == NONE {
                continue;
            }
            let t = target as usize;
            if t >= n || t == 0 {
                return Err(IndexError::Corrupt(format!(
                    "node {i} references invalid node {target}"
                )));
            }
            in_degree[t] = in_degree[t].saturating_add(1);
        }
        if node.word != NONE && node.word as usize >= word_count {
            return Err(IndexError::Corrupt(format!(
                "node {i} references missing word {}",
                node.word
            )));
        }
        if node.label_char().is_none() {
            return Err(IndexError::Corrupt(format!("node {i} has invalid label")));
        }
        if node.is_terminal() && node.score > node.max_score {
            return Err(IndexError::Corrupt(format!(
                "node {i} scores above its subtree maximum"
            )));
        }
    }
    if let Some(i) = in_degree.iter().skip(1).position(|&d| d != 1) {
        return Err(IndexError::Corrupt(format!(
            "node {} is referenced {} times",
            i + 1,
            in_degree[i + 1]
        )));
    }

    for (i, node) in nodes.iter().enumerate() {
        let mut prev_label: Option<u32> = None;
        let mut child = node.first_child;
        let mut steps = 0usize;
        while child != NONE {
            steps += 1;
            if steps > n {
                return Err(IndexError::Corrupt(format!("sibling cycle under node {i}")));
            }
            let c = &nodes[child as usize];
            if prev_label.is_some_and(|p| p >= c.label) {
                return Err(IndexError::Corrupt(format!(
                    "children of node {i} are not in ascending order"
                )));
            }
            if c.max_score > node.max_score {
                return Err(IndexError::Corrupt(format!(
                    "node {child} exceeds the subtree maximum of node {i}"
                )));
            }
            prev_label = Some(c.label);
            child = c.next_sibling;
        }
    }
    Ok(())
}
