/// A disjoint-set (union-find) forest over points addressed by index.
///
/// Every point occupies one slot; the forest never holds attribute data.
/// `find` uses path compression and `union` uses union by rank, so long
/// sequences of operations stay close to O(1) amortized per call.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
    set_count: usize,
}

impl DisjointSets {
    /// Creates a forest of `len` singleton sets, one per point index.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            set_count: len,
        }
    }

    /// Number of elements in the forest.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of distinct sets still alive. Only `union` can lower this.
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Returns the representative of the set containing `x`.
    ///
    /// Every node walked on the way up is re-pointed at the root, which
    /// shortens later lookups. Membership is never changed by a find.
    ///
    /// Panics if `x` is out of bounds.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// Returns `false` (and changes nothing) when they already share a set.
    /// Otherwise the shorter tree is attached under the taller one, the live
    /// set count drops by exactly one, and `true` is returned. On a rank tie
    /// the new root's rank increments.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Equal => {
                self.parent[root_a] = root_b;
                self.rank[root_b] += 1;
            }
        }

        self.set_count -= 1;
        true
    }

    /// True when `a` and `b` currently belong to the same set.
    pub fn same_component(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
