//! Road network representation and builder.
//!
//! # Data layout
//!
//! Links are stored sorted by `LinkId` so that every iteration order in the
//! workspace is deterministic.  Two **Compressed Sparse Row (CSR)** indices
//! map each node to the links leaving and entering it:
//!
//! ```text
//! out_links[ node_out_start[n] .. node_out_start[n+1] ]   // links with from == n
//! in_links [ node_in_start[n]  .. node_in_start[n+1]  ]   // links with to   == n
//! ```
//!
//! Both hold link *slots* (positions in the sorted `links` array), themselves
//! sorted by link id within a node.

use rustc_hash::{FxHashMap, FxHashSet};

use pf_core::{GeoPoint, LinkId, NodeId};

use crate::{NetworkError, NetworkResult};

// ── Link ──────────────────────────────────────────────────────────────────────

/// A directed road segment between two intersections.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in metres.
    pub length_m: f32,
    /// Cost used by shortest-path search.  May differ from `length_m` to
    /// penalise (or favour) particular manoeuvres such as U-turns.
    pub virtual_length: f32,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph of links, plus node positions.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// All links, sorted by id.
    links: Vec<Link>,

    /// `LinkId` → slot in `links`.
    slot_of: FxHashMap<LinkId, u32>,

    node_out_start: Vec<u32>,
    out_links: Vec<u32>,

    node_in_start: Vec<u32>,
    in_links: Vec<u32>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or links.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.slot_of.get(&id).map(|&s| &self.links[s as usize])
    }

    #[inline]
    pub fn contains(&self, id: LinkId) -> bool {
        self.slot_of.contains_key(&id)
    }

    /// All links in ascending id order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// All link ids in ascending order.
    pub fn link_ids(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.links.iter().map(|l| l.id)
    }

    /// Virtual length of `id`, or `None` for an unknown link.
    #[inline]
    pub fn virtual_length(&self, id: LinkId) -> Option<f32> {
        self.link(id).map(|l| l.virtual_length)
    }

    /// Sum of physical lengths over `path`.  Unknown links contribute zero.
    pub fn path_length_m(&self, path: &[LinkId]) -> f64 {
        path.iter()
            .filter_map(|&id| self.link(id))
            .map(|l| l.length_m as f64)
            .sum()
    }

    /// Links leaving `node`, in ascending id order.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> impl Iterator<Item = &Link> + '_ {
        Self::csr_slice(&self.node_out_start, &self.out_links, node)
            .iter()
            .map(|&s| &self.links[s as usize])
    }

    /// Links entering `node`, in ascending id order.
    #[inline]
    pub fn in_links(&self, node: NodeId) -> impl Iterator<Item = &Link> + '_ {
        Self::csr_slice(&self.node_in_start, &self.in_links, node)
            .iter()
            .map(|&s| &self.links[s as usize])
    }

    fn csr_slice<'a>(start: &[u32], items: &'a [u32], node: NodeId) -> &'a [u32] {
        if node.index() + 1 >= start.len() {
            return &[];
        }
        let lo = start[node.index()] as usize;
        let hi = start[node.index() + 1] as usize;
        &items[lo..hi]
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Every `add_link` call is validated immediately, so `build()` itself cannot
/// fail.
///
/// # Example
///
/// ```
/// use pf_core::{GeoPoint, LinkId};
/// use pf_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(30.69, -88.04));
/// let c = b.add_node(GeoPoint::new(30.70, -88.03));
/// b.add_link(LinkId(1), a, c, 1_200.0, 1_200.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.link_count(), 1);
/// ```
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    links: Vec<Link>,
    seen: FxHashSet<LinkId>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), links: Vec::new(), seen: FxHashSet::default() }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
            seen: FxHashSet::with_capacity_and_hasher(links, Default::default()),
        }
    }

    /// Add an intersection node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** link `from → to`.
    ///
    /// Rejects reserved or duplicate ids, unknown endpoints, and negative or
    /// non-finite lengths.
    pub fn add_link(
        &mut self,
        id: LinkId,
        from: NodeId,
        to: NodeId,
        length_m: f32,
        virtual_length: f32,
    ) -> NetworkResult<()> {
        if id.is_reserved() {
            return Err(NetworkError::ReservedLinkId(id));
        }
        for node in [from, to] {
            if node.index() >= self.nodes.len() {
                return Err(NetworkError::NodeNotFound(node));
            }
        }
        for (what, value) in [("length", length_m), ("virtual length", virtual_length)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidLength { link: id, what, value });
            }
        }
        if !self.seen.insert(id) {
            return Err(NetworkError::DuplicateLink(id));
        }
        self.links.push(Link { id, from, to, length_m, virtual_length });
        Ok(())
    }

    /// Add a link whose physical length is the great-circle distance between
    /// its endpoints and whose virtual length equals that distance.
    pub fn add_geodesic_link(&mut self, id: LinkId, from: NodeId, to: NodeId) -> NetworkResult<()> {
        let length = match (self.nodes.get(from.index()), self.nodes.get(to.index())) {
            (Some(a), Some(b)) => a.distance_m(*b),
            _ => 0.0,
        };
        self.add_link(id, from, to, length, length)
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(L log L) for the link sort plus O(N + L) for the
    /// two CSR indices.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        let mut links = self.links;
        links.sort_unstable_by_key(|l| l.id);

        let slot_of: FxHashMap<LinkId, u32> = links
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id, i as u32))
            .collect();

        let (node_out_start, out_links) = build_csr(node_count, &links, |l| l.from);
        let (node_in_start, in_links) = build_csr(node_count, &links, |l| l.to);

        RoadNetwork {
            node_pos: self.nodes,
            links,
            slot_of,
            node_out_start,
            out_links,
            node_in_start,
            in_links,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket link slots by `key(link)`.  `links` is already id-sorted, so a
/// stable counting sort keeps ids ascending within each bucket.
fn build_csr(node_count: usize, links: &[Link], key: impl Fn(&Link) -> NodeId) -> (Vec<u32>, Vec<u32>) {
    let mut start = vec![0u32; node_count + 1];
    for l in links {
        start[key(l).index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }

    let mut cursor = start.clone();
    let mut items = vec![0u32; links.len()];
    for (slot, l) in links.iter().enumerate() {
        let n = key(l).index();
        items[cursor[n] as usize] = slot as u32;
        cursor[n] += 1;
    }
    debug_assert_eq!(start[node_count] as usize, links.len());
    (start, items)
}
