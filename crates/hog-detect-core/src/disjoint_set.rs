/// Union-find over the integer indices `0..len`, with path compression and
/// union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `x`.
    ///
    /// # Panics
    /// Panics if `x >= len`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns `false` if they were
    /// already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.rank[ra] < self.rank[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        if self.rank[ra] == self.rank[rb] {
            self.rank[ra] += 1;
        }
        true
    }

    /// Dense component id per element, numbered by first appearance, plus the
    /// number of components.
    pub fn component_labels(&mut self) -> (Vec<usize>, usize) {
        let n = self.len();
        let mut root_label = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut count = 0;
        for i in 0..n {
            let root = self.find(i);
            if root_label[root] == usize::MAX {
                root_label[root] = count;
                count += 1;
            }
            labels.push(root_label[root]);
        }
        (labels, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_until_joined() {
        let mut ds = DisjointSet::new(4);
        let (labels, count) = ds.component_labels();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert_eq!(count, 4);
    }

    #[test]
    fn union_is_transitive() {
        let mut ds = DisjointSet::new(6);
        assert!(ds.union(0, 3));
        assert!(ds.union(3, 5));
        assert!(!ds.union(5, 0));
        assert!(ds.union(1, 2));

        assert_eq!(ds.find(0), ds.find(5));
        assert_ne!(ds.find(0), ds.find(1));

        let (labels, count) = ds.component_labels();
        assert_eq!(labels, vec![0, 1, 1, 0, 2, 0]);
        assert_eq!(count, 3);
    }

    #[test]
    fn long_chains_compress() {
        let n = 10_000;
        let mut ds = DisjointSet::new(n);
        for i in 1..n {
            ds.union(i - 1, i);
        }
        let root = ds.find(n - 1);
        assert!((0..n).all(|i| ds.find(i) == root));
        assert_eq!(ds.component_labels().1, 1);
    }

    #[test]
    fn empty_set() {
        let mut ds = DisjointSet::new(0);
        assert!(ds.is_empty());
        assert_eq!(ds.component_labels(), (Vec::new(), 0));
    }
}
