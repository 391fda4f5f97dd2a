//! Genotype representation for map layouts
//!
//! A genotype is a fixed-length, order-significant sequence of genes. Each
//! gene is an integer triple `(x, y, z)` tagged with the feature it paints:
//! - **Arena**: square room with origin `(x, y)` and side `|z|`
//! - **Corridor**: 3-wide band from `(x, y)`; `z > 1` runs right for `z`
//!   cells, otherwise it runs down for `|z|` cells
//! - **Barrier**: same encoding as a corridor but 1 tile thick
//! - **HealthPickup**: single tile at `(x, y)`
//! - **CaptureZone**: square with origin `(x, y)` and side `z`
//!
//! Crossover and mutation work on positions, never reorder genes, and keep
//! each position's tag, so every genotype in a run shares one `GenotypeLayout`.
//!
//! Use `Decoder::decode()` to convert Genotype -> TileGrid

use crate::config::map::MapConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gene {
    Arena { x: i32, y: i32, size: i32 },
    Corridor { x: i32, y: i32, length: i32 },
    Barrier { x: i32, y: i32, length: i32 },
    HealthPickup { x: i32, y: i32 },
    CaptureZone { x: i32, y: i32, size: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneKind {
    Arena,
    Corridor,
    Barrier,
    HealthPickup,
    CaptureZone,
}

impl Gene {
    pub fn kind(&self) -> GeneKind {
        match self {
            Gene::Arena { .. } => GeneKind::Arena,
            Gene::Corridor { .. } => GeneKind::Corridor,
            Gene::Barrier { .. } => GeneKind::Barrier,
            Gene::HealthPickup { .. } => GeneKind::HealthPickup,
            Gene::CaptureZone { .. } => GeneKind::CaptureZone,
        }
    }

    /// Raw `(x, y, z)` triple; pickups have no extent and report `z = 0`
    pub fn coords(&self) -> (i32, i32, i32) {
        match *self {
            Gene::Arena { x, y, size } => (x, y, size),
            Gene::Corridor { x, y, length } => (x, y, length),
            Gene::Barrier { x, y, length } => (x, y, length),
            Gene::HealthPickup { x, y } => (x, y, 0),
            Gene::CaptureZone { x, y, size } => (x, y, size),
        }
    }

    /// Same kind of gene with new geometry
    pub fn with_coords(&self, x: i32, y: i32, z: i32) -> Gene {
        GeneKind::build(self.kind(), x, y, z)
    }
}

impl GeneKind {
    pub fn build(kind: GeneKind, x: i32, y: i32, z: i32) -> Gene {
        match kind {
            GeneKind::Arena => Gene::Arena { x, y, size: z },
            GeneKind::Corridor => Gene::Corridor { x, y, length: z },
            GeneKind::Barrier => Gene::Barrier { x, y, length: z },
            GeneKind::HealthPickup => Gene::HealthPickup { x, y },
            GeneKind::CaptureZone => Gene::CaptureZone { x, y, size: z },
        }
    }

    /// Gene that paints nothing
    pub fn blank(self) -> Gene {
        Self::build(self, 0, 0, 0)
    }
}

/// How many genes of each class a genotype carries, in painting order.
/// The single capture-zone gene always comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenotypeLayout {
    pub arenas: usize,
    pub corridors: usize,
    pub barriers: usize,
    pub pickups: usize,
}

impl Default for GenotypeLayout {
    fn default() -> Self {
        Self {
            arenas: 15,
            corridors: 15,
            barriers: 0,
            pickups: 0,
        }
    }
}

impl GenotypeLayout {
    pub fn len(&self) -> usize {
        self.arenas + self.corridors + self.barriers + self.pickups + 1
    }

    pub fn kind_at(&self, index: usize) -> Option<GeneKind> {
        let mut bound = self.arenas;
        if index < bound {
            return Some(GeneKind::Arena);
        }
        bound += self.corridors;
        if index < bound {
            return Some(GeneKind::Corridor);
        }
        bound += self.barriers;
        if index < bound {
            return Some(GeneKind::Barrier);
        }
        bound += self.pickups;
        if index < bound {
            return Some(GeneKind::HealthPickup);
        }
        (index == bound).then_some(GeneKind::CaptureZone)
    }

    /// Genotype of blank genes with the right tags
    pub fn blank(&self) -> Genotype {
        Genotype::new(
            (0..self.len())
                .filter_map(|i| self.kind_at(i))
                .map(GeneKind::blank)
                .collect(),
        )
    }

    /// True if every position carries the tag this layout expects
    pub fn matches(&self, genotype: &Genotype) -> bool {
        genotype.len() == self.len()
            && genotype
                .iter()
                .enumerate()
                .all(|(i, gene)| self.kind_at(i) == Some(gene.kind()))
    }

    pub fn first_index_of(&self, kind: GeneKind) -> usize {
        match kind {
            GeneKind::Arena => 0,
            GeneKind::Corridor => self.arenas,
            GeneKind::Barrier => self.arenas + self.corridors,
            GeneKind::HealthPickup => self.arenas + self.corridors + self.barriers,
            GeneKind::CaptureZone => self.len() - 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genotype {
    genes: Vec<Gene>,
}

impl Genotype {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gene> {
        self.genes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Gene> {
        self.genes.get(index)
    }

    /// Replace the gene at `index`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, gene: Gene) {
        if let Some(slot) = self.genes.get_mut(index) {
            *slot = gene;
        }
    }

    pub fn capture_zone(&self) -> Option<&Gene> {
        self.genes.iter().find(|g| g.kind() == GeneKind::CaptureZone)
    }

    /// Starting layout for a map with no previous winner: one central arena,
    /// eight corridors linking the first two spawn rooms to it, and a 2x2
    /// capture zone in the middle.
    pub fn default_seed(config: &MapConfig) -> Genotype {
        let layout = config.layout;
        let mut genotype = layout.blank();

        let width = config.width as i32;
        let height = config.height as i32;
        let horizontal = width / 2;
        let vertical = height / 2;

        if layout.arenas > 0 {
            genotype.set(
                layout.first_index_of(GeneKind::Arena),
                Gene::Arena { x: horizontal / 2, y: vertical / 2, size: horizontal },
            );
        }

        let references = config.reference_tiles();
        if let [near, far, ..] = references.as_slice() {
            let (ax, ay) = (near.x as i32, near.y as i32);
            let (bx, by) = (far.x as i32, far.y as i32);
            let (half_h, half_v) = (horizontal / 2, vertical / 2);

            let corridors = [
                (ax, ay, half_h),
                (ax, ay, -half_v),
                (ax, ay + half_v, half_h),
                (ax + half_h, ay, -half_v),
                (bx - half_h, by, half_h),
                (bx, by - half_v, -half_v),
                (bx - half_h, by - half_v, half_h),
                (bx - half_h, by - half_v, -half_v),
            ];
            let start = layout.first_index_of(GeneKind::Corridor);
            for (i, &(x, y, length)) in corridors.iter().take(layout.corridors).enumerate() {
                genotype.set(start + i, Gene::Corridor { x, y, length });
            }
        }

        genotype.set(
            layout.first_index_of(GeneKind::CaptureZone),
            Gene::CaptureZone { x: horizontal - 1, y: vertical - 1, size: 2 },
        );
        genotype
    }
}

impl<'a> IntoIterator for &'a Genotype {
    type Item = &'a Gene;
    type IntoIter = std::slice::Iter<'a, Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}
