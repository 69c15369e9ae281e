//! Map rendering adapter.
//!
//! Everything that draws a world map goes through [`MapRenderer::render_map`],
//! which returns a disposable handle. [`MapWidget`] owns at most one handle
//! per [`MountPoint`] and always disposes the previous chart before creating
//! the next one.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::color::{map_metric, Rgb, Rgba, NEUTRAL_GRAY};
use crate::domain::{CountryRecord, Metric, RegionFilter, TariffKind};
use crate::error::MapError;
use crate::format::format_metric;
use crate::geo::Geodata;

/// Pieces of the map library, loaded strictly in [`LOAD_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LibraryModule {
    Core,
    MapModule,
    Geodata,
    Theme,
}

impl fmt::Display for LibraryModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::MapModule => write!(f, "map"),
            Self::Geodata => write!(f, "geodata"),
            Self::Theme => write!(f, "theme"),
        }
    }
}

pub const LOAD_ORDER: [LibraryModule; 4] = [
    LibraryModule::Core,
    LibraryModule::MapModule,
    LibraryModule::Geodata,
    LibraryModule::Theme,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub outline: Rgb,
    pub highlight: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x11, 0x18, 0x27),
            outline: Rgb::new(0x4B, 0x55, 0x63),
            highlight: Rgb::new(0xFA, 0xCC, 0x15),
        }
    }
}

/// Typed handle returned once every module has loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLibrary {
    pub geodata: Geodata,
    pub theme: Theme,
}

pub trait LibraryLoader {
    /// Loads one module. Called once per module, in [`LOAD_ORDER`].
    fn load(&mut self, module: LibraryModule) -> Result<(), MapError>;

    fn finish(&mut self) -> Result<MapLibrary, MapError>;
}

/// Loads every module sequentially and returns the library handle.
///
/// Stops at the first failing module.
pub fn ensure_loaded<L: LibraryLoader + ?Sized>(loader: &mut L) -> Result<MapLibrary, MapError> {
    for module in LOAD_ORDER {
        debug!(%module, "loading map module");
        if let Err(err) = loader.load(module) {
            warn!(%module, error = %err, "map module failed to load");
            return Err(err);
        }
    }
    loader.finish()
}

/// Loader backed by the geodata table compiled into the crate.
#[derive(Debug, Clone, Default)]
pub struct BundledLoader {
    theme: Theme,
    loaded: Vec<LibraryModule>,
    geodata: Option<Geodata>,
}

impl BundledLoader {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            loaded: Vec::new(),
            geodata: None,
        }
    }
}

impl LibraryLoader for BundledLoader {
    fn load(&mut self, module: LibraryModule) -> Result<(), MapError> {
        let expected = LOAD_ORDER.get(self.loaded.len()).copied();
        if expected != Some(module) && !self.loaded.contains(&module) {
            return Err(MapError::Load {
                module,
                reason: format!("out of order, expected {expected:?}"),
            });
        }

        if module == LibraryModule::Geodata && self.geodata.is_none() {
            let geodata = Geodata::bundled().map_err(|err| MapError::Load {
                module,
                reason: err.to_string(),
            })?;
            self.geodata = Some(geodata);
        }

        if !self.loaded.contains(&module) {
            self.loaded.push(module);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<MapLibrary, MapError> {
        if let Some(missing) = LOAD_ORDER
            .into_iter()
            .find(|module| !self.loaded.contains(module))
        {
            return Err(MapError::Load {
                module: missing,
                reason: "not loaded".to_string(),
            });
        }

        let geodata = self.geodata.clone().ok_or_else(|| MapError::Load {
            module: LibraryModule::Geodata,
            reason: "not loaded".to_string(),
        })?;

        Ok(MapLibrary {
            geodata,
            theme: self.theme,
        })
    }
}

/// Display parameters for one map render.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub metric: Metric,
    pub region: RegionFilter,
    /// When set, the tariff toggle drives coloring instead of `metric`.
    pub tariff: Option<TariffKind>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            metric: Metric::ReciprocalTariff,
            region: RegionFilter::All,
            tariff: None,
        }
    }
}

impl MapOptions {
    pub fn active_metric(&self) -> Metric {
        self.tariff.map_or(self.metric, TariffKind::metric)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub code: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub fill: Rgba,
    pub interactive: bool,
    pub tooltip: Option<String>,
    pub value: Option<f64>,
    pub record: Option<CountryRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub metric: Metric,
    pub features: Vec<MapFeature>,
}

impl MapScene {
    pub fn interactive_count(&self) -> usize {
        self.features.iter().filter(|feature| feature.interactive).count()
    }
}

/// Colors every geodata country for the active metric.
///
/// Countries absent from `records`, or excluded by the region filter, get the
/// neutral fill and no interaction.
pub fn build_scene(
    library: &MapLibrary,
    records: &[CountryRecord],
    options: &MapOptions,
) -> MapScene {
    let metric = options.active_metric();

    for record in records {
        if library.geodata.lookup(&record.id).is_none() {
            warn!(id = %record.id, "country has no map placement");
        }
    }

    let features = library
        .geodata
        .countries()
        .iter()
        .map(|country| {
            let record = records
                .iter()
                .find(|record| country.matches_code(&record.id))
                .filter(|record| options.region.matches(record));

            match record {
                Some(record) => {
                    let mapped = map_metric(record, metric);
                    MapFeature {
                        code: country.iso2.clone(),
                        name: record.name.clone(),
                        lon: country.lon,
                        lat: country.lat,
                        fill: mapped.color,
                        interactive: true,
                        tooltip: Some(format!(
                            "{}: {}",
                            record.name,
                            format_metric(mapped.value, metric)
                        )),
                        value: mapped.value,
                        record: Some(record.clone()),
                    }
                }
                None => MapFeature {
                    code: country.iso2.clone(),
                    name: country.name.clone(),
                    lon: country.lon,
                    lat: country.lat,
                    fill: NEUTRAL_GRAY,
                    interactive: false,
                    tooltip: None,
                    value: None,
                    record: None,
                },
            }
        })
        .collect();

    MapScene { metric, features }
}

/// The mount node a chart draws into. Owned by one chart at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    id: String,
    owner: Option<u64>,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn owner(&self) -> Option<u64> {
        self.owner
    }

    pub fn claim(&mut self, instance: u64) -> Result<(), MapError> {
        match self.owner {
            Some(owner) if owner != instance => Err(MapError::MountBusy {
                mount: self.id.clone(),
                owner,
            }),
            _ => {
                self.owner = Some(instance);
                Ok(())
            }
        }
    }

    pub fn release(&mut self, instance: u64) {
        if self.owner == Some(instance) {
            self.owner = None;
        }
    }
}

pub type SelectionCallback = Box<dyn FnMut(&CountryRecord)>;

pub trait MapHandle {
    fn instance(&self) -> u64;

    /// Releases the mount and drops interaction callbacks. Idempotent.
    fn dispose(&mut self, mount: &mut MountPoint);

    fn is_disposed(&self) -> bool;
}

pub trait MapRenderer {
    type Handle: MapHandle;

    fn render_map(
        &mut self,
        library: &MapLibrary,
        mount: &mut MountPoint,
        records: &[CountryRecord],
        on_select: SelectionCallback,
        options: &MapOptions,
    ) -> Result<Self::Handle, MapError>;
}

/// Degrees within which a pointer position hits a country marker.
pub const HIT_RADIUS_DEG: f64 = 6.0;

#[derive(Debug, Default)]
pub struct ChoroplethRenderer {
    next_instance: u64,
}

impl MapRenderer for ChoroplethRenderer {
    type Handle = ChoroplethChart;

    fn render_map(
        &mut self,
        library: &MapLibrary,
        mount: &mut MountPoint,
        records: &[CountryRecord],
        on_select: SelectionCallback,
        options: &MapOptions,
    ) -> Result<Self::Handle, MapError> {
        self.next_instance += 1;
        let instance = self.next_instance;
        mount.claim(instance)?;

        let scene = build_scene(library, records, options);
        debug!(
            instance,
            mount = mount.id(),
            interactive = scene.interactive_count(),
            metric = scene.metric.as_str(),
            "created map chart"
        );

        Ok(ChoroplethChart {
            instance,
            scene,
            theme: library.theme,
            on_select: Some(on_select),
            hovered: None,
            focused: None,
        })
    }
}

pub struct ChoroplethChart {
    instance: u64,
    scene: MapScene,
    theme: Theme,
    on_select: Option<SelectionCallback>,
    hovered: Option<usize>,
    focused: Option<usize>,
}

impl fmt::Debug for ChoroplethChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoroplethChart")
            .field("instance", &self.instance)
            .field("features", &self.scene.features.len())
            .field("hovered", &self.hovered)
            .field("focused", &self.focused)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl ChoroplethChart {
    pub const fn scene(&self) -> &MapScene {
        &self.scene
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Nearest feature to a lon/lat position, interactive or not.
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.scene
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| (index, (feature.lon - lon).hypot(feature.lat - lat)))
            .filter(|(_, distance)| *distance <= HIT_RADIUS_DEG)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }

    fn interactive_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.feature_at(lon, lat)
            .filter(|index| self.scene.features[*index].interactive)
    }

    /// Highlights the interactive country under the pointer and returns its tooltip.
    pub fn pointer_over(&mut self, lon: f64, lat: f64) -> Option<&str> {
        if self.is_disposed() {
            return None;
        }
        self.hovered = self.interactive_at(lon, lat);
        self.hovered_feature()
            .and_then(|feature| feature.tooltip.as_deref())
    }

    pub fn pointer_out(&mut self) {
        self.hovered = None;
    }

    /// Invokes the selection callback if an interactive country was hit.
    pub fn click(&mut self, lon: f64, lat: f64) -> bool {
        let Some(index) = self.interactive_at(lon, lat) else {
            return false;
        };
        self.select(index)
    }

    fn select(&mut self, index: usize) -> bool {
        let Some(record) = self.scene.features[index].record.as_ref() else {
            return false;
        };
        match self.on_select.as_mut() {
            Some(callback) => {
                callback(record);
                true
            }
            None => false,
        }
    }

    pub fn hovered_feature(&self) -> Option<&MapFeature> {
        self.hovered.map(|index| &self.scene.features[index])
    }

    pub fn focused_feature(&self) -> Option<&MapFeature> {
        self.focused.map(|index| &self.scene.features[index])
    }

    /// Interactive feature indices ordered west to east.
    fn focus_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .scene
            .features
            .iter()
            .enumerate()
            .filter(|(_, feature)| feature.interactive)
            .map(|(index, _)| index)
            .collect();
        order.sort_by(|a, b| {
            self.scene.features[*a]
                .lon
                .total_cmp(&self.scene.features[*b].lon)
        });
        order
    }

    fn move_focus(&mut self, forward: bool) -> Option<&MapFeature> {
        let order = self.focus_order();
        if order.is_empty() || self.is_disposed() {
            self.focused = None;
            return None;
        }

        let position = self
            .focused
            .and_then(|current| order.iter().position(|index| *index == current));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(position), true) => (position + 1) % order.len(),
            (Some(position), false) => (position + order.len() - 1) % order.len(),
        };

        self.focused = Some(order[next]);
        self.hovered = self.focused;
        self.focused_feature()
    }

    pub fn focus_next(&mut self) -> Option<&MapFeature> {
        self.move_focus(true)
    }

    pub fn focus_prev(&mut self) -> Option<&MapFeature> {
        self.move_focus(false)
    }

    pub fn activate_focused(&mut self) -> bool {
        self.focused.is_some_and(|index| self.select(index))
    }
}

impl MapHandle for ChoroplethChart {
    fn instance(&self) -> u64 {
        self.instance
    }

    fn dispose(&mut self, mount: &mut MountPoint) {
        if self.on_select.take().is_some() {
            debug!(instance = self.instance, mount = mount.id(), "disposed map chart");
        }
        self.hovered = None;
        self.focused = None;
        mount.release(self.instance);
    }

    fn is_disposed(&self) -> bool {
        self.on_select.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WidgetState {
    Uninitialized,
    Loading,
    Ready,
    Disposing,
    Disposed,
}

/// One map widget bound to one mount point.
///
/// `Uninitialized -> Loading -> Ready -> Disposing -> Loading -> Ready`, and
/// `Ready -> Disposed` on teardown.
pub struct MapWidget<R: MapRenderer> {
    renderer: R,
    mount: MountPoint,
    library: Option<MapLibrary>,
    current: Option<R::Handle>,
    state: WidgetState,
    last_error: Option<MapError>,
}

impl<R: MapRenderer> fmt::Debug for MapWidget<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapWidget")
            .field("mount", &self.mount)
            .field("state", &self.state)
            .field("instance", &self.current.as_ref().map(MapHandle::instance))
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl<R: MapRenderer> MapWidget<R> {
    pub fn new(renderer: R, mount: MountPoint) -> Self {
        Self {
            renderer,
            mount,
            library: None,
            current: None,
            state: WidgetState::Uninitialized,
            last_error: None,
        }
    }

    pub const fn state(&self) -> WidgetState {
        self.state
    }

    pub const fn chart(&self) -> Option<&R::Handle> {
        self.current.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut R::Handle> {
        self.current.as_mut()
    }

    pub const fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub const fn library(&self) -> Option<&MapLibrary> {
        self.library.as_ref()
    }

    pub const fn last_error(&self) -> Option<&MapError> {
        self.last_error.as_ref()
    }

    fn transition(state: &mut WidgetState, next: WidgetState) {
        debug!(from = ?*state, to = ?next, "map widget transition");
        *state = next;
    }

    fn dispose_current(&mut self) {
        if let Some(mut handle) = self.current.take() {
            Self::transition(&mut self.state, WidgetState::Disposing);
            handle.dispose(&mut self.mount);
        }
    }

    /// Rebuilds the chart for new data, filter or display mode.
    ///
    /// The previous chart is disposed first. After [`teardown`](Self::teardown)
    /// this does nothing.
    pub fn update<L: LibraryLoader + ?Sized>(
        &mut self,
        loader: &mut L,
        records: &[CountryRecord],
        options: &MapOptions,
        on_select: SelectionCallback,
    ) -> Result<(), MapError> {
        if self.state == WidgetState::Disposed {
            debug!(mount = self.mount.id(), "ignoring update on disposed map widget");
            return Ok(());
        }

        self.dispose_current();
        Self::transition(&mut self.state, WidgetState::Loading);

        if self.library.is_none() {
            match ensure_loaded(loader) {
                Ok(library) => self.library = Some(library),
                Err(err) => return Err(self.fail(err)),
            }
        }

        let Some(library) = self.library.as_ref() else {
            return Err(self.fail(MapError::Disposed));
        };

        match self
            .renderer
            .render_map(library, &mut self.mount, records, on_select, options)
        {
            Ok(handle) => {
                self.current = Some(handle);
                self.last_error = None;
                Self::transition(&mut self.state, WidgetState::Ready);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: MapError) -> MapError {
        warn!(mount = self.mount.id(), error = %err, "map widget failed to render");
        self.last_error = Some(err.clone());
        Self::transition(&mut self.state, WidgetState::Uninitialized);
        err
    }

    /// Disposes the current chart. Further updates are ignored.
    pub fn teardown(&mut self) {
        self.dispose_current();
        Self::transition(&mut self.state, WidgetState::Disposed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn library() -> MapLibrary {
        MapLibrary {
            geodata: Geodata::bundled().expect("bundled geodata"),
            theme: Theme::default(),
        }
    }

    fn record(id: &str, name: &str, tariff: Option<f64>) -> CountryRecord {
        let mut record = CountryRecord::new(id, name);
        record.reciprocal_tariff = tariff;
        record.tariffs_to_us = tariff.map(|value| value / 2.0);
        record
    }

    fn records() -> Vec<CountryRecord> {
        let mut japan = record("JP", "Japan", Some(24.0));
        japan.policy_groups = vec![crate::domain::PolicyGroup::G20];
        vec![japan, record("VN", "Vietnam", Some(46.0))]
    }

    struct RecordingLoader {
        calls: Vec<LibraryModule>,
        fail_on: Option<LibraryModule>,
    }

    impl LibraryLoader for RecordingLoader {
        fn load(&mut self, module: LibraryModule) -> Result<(), MapError> {
            self.calls.push(module);
            if self.fail_on == Some(module) {
                return Err(MapError::Load {
                    module,
                    reason: "cdn unreachable".to_string(),
                });
            }
            Ok(())
        }

        fn finish(&mut self) -> Result<MapLibrary, MapError> {
            Ok(library())
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        live: Rc<Cell<i32>>,
        next: u64,
    }

    struct CountingHandle {
        instance: u64,
        live: Rc<Cell<i32>>,
        disposed: bool,
    }

    impl MapHandle for CountingHandle {
        fn instance(&self) -> u64 {
            self.instance
        }

        fn dispose(&mut self, mount: &mut MountPoint) {
            if !self.disposed {
                self.disposed = true;
                self.live.set(self.live.get() - 1);
            }
            mount.release(self.instance);
        }

        fn is_disposed(&self) -> bool {
            self.disposed
        }
    }

    impl MapRenderer for CountingRenderer {
        type Handle = CountingHandle;

        fn render_map(
            &mut self,
            _library: &MapLibrary,
            mount: &mut MountPoint,
            _records: &[CountryRecord],
            _on_select: SelectionCallback,
            _options: &MapOptions,
        ) -> Result<Self::Handle, MapError> {
            self.next += 1;
            mount.claim(self.next)?;
            self.live.set(self.live.get() + 1);
            Ok(CountingHandle {
                instance: self.next,
                live: Rc::clone(&self.live),
                disposed: false,
            })
        }
    }

    fn loader() -> RecordingLoader {
        RecordingLoader {
            calls: Vec::new(),
            fail_on: None,
        }
    }

    #[test]
    fn modules_load_in_fixed_order() {
        let mut loader = loader();
        ensure_loaded(&mut loader).expect("loads");
        assert_eq!(loader.calls, LOAD_ORDER);
    }

    #[test]
    fn load_stops_at_first_failure() {
        let mut loader = RecordingLoader {
            calls: Vec::new(),
            fail_on: Some(LibraryModule::MapModule),
        };
        let err = ensure_loaded(&mut loader).unwrap_err();
        assert_eq!(loader.calls, [LibraryModule::Core, LibraryModule::MapModule]);
        assert!(matches!(err, MapError::Load { module: LibraryModule::MapModule, .. }));
    }

    #[test]
    fn bundled_loader_rejects_out_of_order_modules() {
        let mut loader = BundledLoader::default();
        assert!(loader.load(LibraryModule::Geodata).is_err());
        assert!(loader.finish().is_err());
        assert!(ensure_loaded(&mut loader).is_ok());
    }

    #[test]
    fn rebuilding_never_leaves_more_than_one_live_chart() {
        let renderer = CountingRenderer::default();
        let live = Rc::clone(&renderer.live);
        let mut widget = MapWidget::new(renderer, MountPoint::new("map"));
        let mut loader = loader();
        let data = records();

        for metric in Metric::ALL {
            let options = MapOptions {
                metric,
                ..MapOptions::default()
            };
            widget
                .update(&mut loader, &data, &options, Box::new(|_| {}))
                .expect("update");
            assert_eq!(live.get(), 1);
            assert_eq!(widget.state(), WidgetState::Ready);
            assert_eq!(
                widget.mount().owner(),
                widget.chart().map(MapHandle::instance)
            );
        }

        // The library is loaded once and reused.
        assert_eq!(loader.calls.len(), LOAD_ORDER.len());

        widget.teardown();
        assert_eq!(live.get(), 0);
        assert_eq!(widget.state(), WidgetState::Disposed);
        assert_eq!(widget.mount().owner(), None);

        widget
            .update(&mut loader, &data, &MapOptions::default(), Box::new(|_| {}))
            .expect("no-op after teardown");
        assert_eq!(live.get(), 0);
        assert_eq!(widget.state(), WidgetState::Disposed);
    }

    #[test]
    fn failed_load_leaves_widget_uninitialized() {
        let mut widget = MapWidget::new(CountingRenderer::default(), MountPoint::new("map"));
        let mut loader = RecordingLoader {
            calls: Vec::new(),
            fail_on: Some(LibraryModule::Theme),
        };

        let result = widget.update(&mut loader, &records(), &MapOptions::default(), Box::new(|_| {}));
        assert!(result.is_err());
        assert_eq!(widget.state(), WidgetState::Uninitialized);
        assert!(widget.chart().is_none());
        assert!(widget.last_error().is_some());
    }

    #[test]
    fn mount_refuses_a_second_owner() {
        let mut mount = MountPoint::new("map");
        mount.claim(1).expect("free mount");
        assert!(matches!(mount.claim(2), Err(MapError::MountBusy { owner: 1, .. })));
        mount.release(2);
        assert_eq!(mount.owner(), Some(1));
        mount.release(1);
        assert!(mount.claim(2).is_ok());
    }

    #[test]
    fn absent_countries_are_neutral_and_inert() {
        let scene = build_scene(&library(), &records(), &MapOptions::default());
        let brazil = scene
            .features
            .iter()
            .find(|feature| feature.code == "BR")
            .expect("brazil placed");
        assert_eq!(brazil.fill, NEUTRAL_GRAY);
        assert!(!brazil.interactive);
        assert!(brazil.tooltip.is_none());
        assert_eq!(scene.interactive_count(), 2);
    }

    #[test]
    fn tariff_toggle_swaps_tooltip_metric() {
        let mut options = MapOptions {
            tariff: Some(TariffKind::Reciprocal),
            ..MapOptions::default()
        };
        let reciprocal = build_scene(&library(), &records(), &options);
        options.tariff = Some(TariffKind::ToUs);
        let to_us = build_scene(&library(), &records(), &options);

        let tooltip = |scene: &MapScene| {
            scene
                .features
                .iter()
                .find(|feature| feature.code == "VN")
                .and_then(|feature| feature.tooltip.clone())
        };
        assert_eq!(tooltip(&reciprocal).as_deref(), Some("Vietnam: 46.0%"));
        assert_eq!(tooltip(&to_us).as_deref(), Some("Vietnam: 23.0%"));
        assert_eq!(to_us.metric, Metric::TariffsToUs);
    }

    #[test]
    fn region_filter_limits_interaction_without_touching_data() {
        let data = records();
        let g20 = build_scene(
            &library(),
            &data,
            &MapOptions {
                region: RegionFilter::G20,
                ..MapOptions::default()
            },
        );
        let non_g20 = build_scene(
            &library(),
            &data,
            &MapOptions {
                region: RegionFilter::NonG20,
                ..MapOptions::default()
            },
        );

        let interactive = |scene: &MapScene| -> Vec<String> {
            scene
                .features
                .iter()
                .filter(|feature| feature.interactive)
                .map(|feature| feature.code.clone())
                .collect()
        };
        assert_eq!(interactive(&g20), ["JP"]);
        assert_eq!(interactive(&non_g20), ["VN"]);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn click_selects_only_interactive_countries() {
        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        let mut renderer = ChoroplethRenderer::default();
        let mut mount = MountPoint::new("map");
        let mut chart = renderer
            .render_map(
                &library(),
                &mut mount,
                &records(),
                Box::new(move |record| sink.borrow_mut().push(record.id.clone())),
                &MapOptions::default(),
            )
            .expect("chart");

        // Vietnam centroid.
        assert!(chart.click(108.3, 14.1));
        // Brazil is on the map but not in the dataset.
        assert!(!chart.click(-51.9, -14.2));
        assert_eq!(chart.pointer_over(-51.9, -14.2), None);
        // Open ocean.
        assert!(!chart.click(-150.0, -50.0));
        assert_eq!(*selected.borrow(), ["VN"]);

        assert_eq!(chart.pointer_over(138.0, 36.0), Some("Japan: 24.0%"));

        chart.dispose(&mut mount);
        assert!(chart.is_disposed());
        assert!(!chart.click(108.3, 14.1));
        assert_eq!(mount.owner(), None);
        assert_eq!(selected.borrow().len(), 1);
    }

    #[test]
    fn keyboard_focus_cycles_west_to_east() {
        let mut renderer = ChoroplethRenderer::default();
        let mut mount = MountPoint::new("map");
        let mut chart = renderer
            .render_map(
                &library(),
                &mut mount,
                &records(),
                Box::new(|_| {}),
                &MapOptions::default(),
            )
            .expect("chart");

        let codes: Vec<String> = (0..3)
            .filter_map(|_| chart.focus_next().map(|feature| feature.code.clone()))
            .collect();
        assert_eq!(codes, ["VN", "JP", "VN"]);
        assert_eq!(chart.focus_prev().map(|f| f.code.clone()).as_deref(), Some("JP"));
        assert!(chart.activate_focused());
    }
}
