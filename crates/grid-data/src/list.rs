//! Ordered collections of grids.

use crate::dataset::GridDataset;

/// An ordered list of datasets, typically several variables on one grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridList {
    datasets: Vec<GridDataset>,
}

impl GridList {
    pub fn new(datasets: Vec<GridDataset>) -> Self {
        Self { datasets }
    }

    pub fn push(&mut self, dataset: GridDataset) {
        self.datasets.push(dataset);
    }

    pub fn get(&self, index: usize) -> Option<&GridDataset> {
        self.datasets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridDataset> {
        self.datasets.iter()
    }

    /// Names of the member datasets, in order.
    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().map(GridDataset::name).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl FromIterator<GridDataset> for GridList {
    fn from_iter<I: IntoIterator<Item = GridDataset>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for GridList {
    type Item = GridDataset;
    type IntoIter = std::vec::IntoIter<GridDataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.into_iter()
    }
}

impl<'a> IntoIterator for &'a GridList {
    type Item = &'a GridDataset;
    type IntoIter = std::slice::Iter<'a, GridDataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}
