//! Fluent builder for constructing a [`NetworkAssembler`].

use sn_core::{Settings, SnapSettings};
use sn_network::{ArtificialEdgeSplicer, EdgeQueryPort, ProjectionSplicer};

use crate::{AssembleError, AssembleResult, NetworkAssembler};

/// Fluent builder for [`NetworkAssembler<Q, S>`].
///
/// Configuration is resolved once, in [`build`](Self::build); a missing snap
/// tolerance fails there rather than on the first request.
///
/// # Inputs
///
/// | Method               | Effect                                              |
/// |----------------------|-----------------------------------------------------|
/// | `.settings(s)`       | Layered settings; resolved into `SnapSettings`      |
/// | `.snap_settings(s)`  | Typed settings; takes precedence over `.settings`   |
///
/// # Example
///
/// ```rust,ignore
/// let assembler = AssemblerBuilder::new(store)
///     .settings(Settings::from_toml_path(path)?)
///     .build()?;
/// let subgraph = assembler.assemble(&request, &CancellationToken::new())?;
/// ```
pub struct AssemblerBuilder<Q: EdgeQueryPort> {
    store:    Q,
    settings: Option<Settings>,
    snap:     Option<SnapSettings>,
}

impl<Q: EdgeQueryPort> AssemblerBuilder<Q> {
    pub fn new(store: Q) -> Self {
        Self { store, settings: None, snap: None }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn snap_settings(mut self, snap: SnapSettings) -> Self {
        self.snap = Some(snap);
        self
    }

    fn resolve(&self) -> AssembleResult<SnapSettings> {
        match (self.snap, &self.settings) {
            (Some(snap), _) => {
                if !(snap.snap_tolerance_m.is_finite() && snap.snap_tolerance_m > 0.0) {
                    return Err(AssembleError::Config(format!(
                        "snap tolerance must be > 0, got {}",
                        snap.snap_tolerance_m
                    )));
                }
                Ok(snap)
            }
            (None, Some(settings)) => Ok(SnapSettings::resolve(settings)?),
            (None, None) => Err(AssembleError::ConfigurationMissing(
                sn_core::settings::SNAP_TOLERANCE_KEY.to_owned(),
            )),
        }
    }

    /// Resolve configuration and pair the store with a [`ProjectionSplicer`]
    /// drawing ids from the configured artificial range.
    pub fn build(self) -> AssembleResult<NetworkAssembler<Q, ProjectionSplicer>> {
        let snap = self.resolve()?;
        let splicer = ProjectionSplicer::new(snap.artificial_id_base)
            .map_err(|e| AssembleError::Config(e.to_string()))?;
        Ok(NetworkAssembler { store: self.store, splicer, snap })
    }

    /// Like [`build`](Self::build) with a caller-supplied splicer.
    pub fn build_with_splicer<S: ArtificialEdgeSplicer>(
        self,
        splicer: S,
    ) -> AssembleResult<NetworkAssembler<Q, S>> {
        let snap = self.resolve()?;
        Ok(NetworkAssembler { store: self.store, splicer, snap })
    }
}
