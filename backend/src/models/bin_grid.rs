//! Size bin grid

use super::error::EntityError;
use crate::core::handle::ResourceHandle;
use crate::core::kind::{GridKind, OrdinalKind};
use crate::core::marshal::read_array;
use crate::native::BinGridNative;

/// 1D grid of radius bins
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceBinGrid;
/// use aero_bridge_core_rs::BinGrid;
///
/// let native = ReferenceBinGrid::default();
/// let grid = BinGrid::new(&native, 4, "linear", 0.0, 4.0).unwrap();
/// assert_eq!(grid.len(), 4);
/// assert_eq!(grid.edges(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(grid.centers(), vec![0.5, 1.5, 2.5, 3.5]);
/// ```
#[derive(Debug)]
pub struct BinGrid<'n, G: BinGridNative> {
    handle: ResourceHandle<'n, G>,
}

impl<'n, G: BinGridNative> BinGrid<'n, G> {
    /// Lay out `n_bin` bins between edges `min` and `max` (m)
    ///
    /// # Errors
    ///
    /// - `kind` is not `"log"` or `"linear"`
    /// - `n_bin` is zero
    /// - `min >= max`, or `min <= 0` on a log grid
    pub fn new(
        native: &'n G,
        n_bin: usize,
        kind: &str,
        min: f64,
        max: f64,
    ) -> Result<Self, EntityError> {
        let kind = GridKind::from_name(kind)?;

        if n_bin == 0 {
            return Err(EntityError::InvalidArgument(
                "n_bin must be positive".to_string(),
            ));
        }
        if !(min < max) {
            return Err(EntityError::InvalidArgument(format!(
                "grid bounds must satisfy min < max, got [{}, {}]",
                min, max
            )));
        }
        if kind == GridKind::Log && !(min > 0.0) {
            return Err(EntityError::InvalidArgument(format!(
                "log grid needs a positive lower bound, got {}",
                min
            )));
        }

        let mut handle = ResourceHandle::construct(native);
        native.init(handle.mutable_access(), n_bin, kind.encode(), min, max);
        Ok(Self { handle })
    }

    pub(crate) fn raw(&self) -> &G::Raw {
        self.handle.const_access()
    }

    fn native(&self) -> &'n G {
        self.handle.native()
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.native().size(self.raw())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> Result<GridKind, EntityError> {
        Ok(GridKind::decode(self.native().kind_ordinal(self.raw()))?)
    }

    /// Bin edges (m), `len() + 1` elements
    pub fn edges(&self) -> Vec<f64> {
        read_array(|| self.len() + 1, |out| self.native().edges(self.raw(), out))
    }

    /// Bin centers (m)
    pub fn centers(&self) -> Vec<f64> {
        read_array(|| self.len(), |out| self.native().centers(self.raw(), out))
    }

    /// Bin widths (m for linear grids, natural-log width for log grids)
    pub fn widths(&self) -> Vec<f64> {
        read_array(|| self.len(), |out| self.native().widths(self.raw(), out))
    }
}
