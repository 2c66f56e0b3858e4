// File: crates/grapher-core/src/chart.rs
// Summary: Chart handle binding one ConfigStore to a host container and a retained Scene.

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::ChartConfig;
use crate::csv_export::{to_csv, to_csv_rfc4180};
use crate::derive::Derived;
use crate::draw::{self, arc::arc_size, DrawOutcome, Frame, PlotGeometry};
use crate::error::{DerivationError, Result};
use crate::host::{require_element, Host};
use crate::merge::MergeMode;
use crate::render::{Layer, Renderer, Scene};
use crate::store::ConfigStore;
use crate::theme::Theme;
use crate::tooltip::{self, TooltipHit};
use crate::types::{ChartKind, Environment};

/// One chart instance inside one container.
pub struct Chart {
    id: String,
    host: Rc<dyn Host>,
    store: ConfigStore,
    scene: Scene,
    theme: Theme,
    width: Option<f32>,
    height: Option<f32>,
    geometry: Option<PlotGeometry>,
    tooltip: Option<TooltipHit>,
}

impl Chart {
    /// Look up the container, build defaults for `kind` and apply `config`.
    /// Nothing is drawn until [`Chart::draw`].
    pub fn create(
        host: Rc<dyn Host>,
        container_id: &str,
        kind: ChartKind,
        config: &Value,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<Self> {
        Self::create_with_mode(host, container_id, kind, config, width, height, MergeMode::default())
    }

    pub fn create_with_mode(
        host: Rc<dyn Host>,
        container_id: &str,
        kind: ChartKind,
        config: &Value,
        width: Option<f32>,
        height: Option<f32>,
        mode: MergeMode,
    ) -> Result<Self> {
        let element = require_element(host.as_ref(), container_id)?;
        let env = Environment {
            width: width.unwrap_or(element.width),
            height: height.unwrap_or(element.height),
            font_size: element.font_size,
        };
        let mut store = ConfigStore::new(mode, env);
        store.initialize(kind, config)?;
        info!(container = container_id, %kind, width = env.width, height = env.height, "chart created");
        let theme = Theme::from_style(&element.color, &element.background_color, element.font_size);
        Ok(Self {
            id: container_id.to_string(),
            host,
            store,
            scene: Scene::new(env.width, env.height, theme.background.clone()),
            theme,
            width,
            height,
            geometry: None,
            tooltip: None,
        })
    }

    /// Re-read the container (size, computed style) into the store and theme.
    fn refresh_environment(&mut self) -> Result<()> {
        let element = require_element(self.host.as_ref(), &self.id)?;
        self.theme = Theme::from_style(&element.color, &element.background_color, element.font_size);
        self.store.set_environment(Environment {
            width: self.width.unwrap_or(element.width),
            height: self.height.unwrap_or(element.height),
            font_size: element.font_size,
        });
        Ok(())
    }

    /// Merge `partial` (when given), re-derive and render into the scene.
    ///
    /// A derivation error is returned and leaves the previous scene in place.
    pub fn draw(&mut self, partial: Option<&Value>) -> Result<DrawOutcome> {
        if let Some(partial) = partial {
            self.store.merge(partial)?;
        }
        self.refresh_environment()?;
        let derived = self.store.derived()?;
        let config = self.store.config();
        let env = *self.store.environment();
        let (width, height) = if config.kind.is_arc() {
            let size = arc_size(env.width, env.height);
            (size, size * config.arc.max_height_ratio)
        } else {
            (env.width, env.height)
        };

        self.scene.clear();
        self.scene.resize(width, height);
        self.scene.background = self.theme.background.clone();
        let frame = Frame { config, derived, theme: &self.theme, host: self.host.as_ref(), width, height };
        let (outcome, geometry) = draw::render(&frame, &mut self.scene);
        debug!(container = %self.id, kind = %config.kind, primitives = self.scene.len(), ?outcome, "chart drawn");
        self.geometry = geometry;
        self.tooltip = None;
        Ok(outcome)
    }

    /// Remove everything rendered. Configuration is kept.
    pub fn wipe(&mut self) {
        self.scene.clear();
        self.geometry = None;
        self.tooltip = None;
    }

    /// Pointer moved to `(x, y)` in scene coordinates. Each event replaces the previous tooltip.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<&TooltipHit> {
        let geometry = self.geometry.as_ref()?;
        if x < geometry.area.left {
            return self.tooltip.as_ref();
        }
        let derived = self.store.derived().ok()?;
        let config = self.store.config();
        let frame = Frame {
            config,
            derived,
            theme: &self.theme,
            host: self.host.as_ref(),
            width: self.scene.width,
            height: self.scene.height,
        };
        let hit = tooltip::hit(&frame, geometry, (x, y));
        match &hit {
            Some(hit) => tooltip::draw(&frame, geometry, hit, &mut self.scene),
            None => self.scene.clear_layer(Layer::Tooltip),
        }
        if config.kind.has_lines() {
            draw::redraw_marks(&frame, geometry, hit.as_ref().and_then(|h| h.highlight.as_ref()), &mut self.scene);
        }
        self.tooltip = hit;
        self.tooltip.as_ref()
    }

    /// Pointer left the plot: hide the tooltip and drop any emphasis.
    pub fn pointer_leave(&mut self) {
        self.scene.clear_layer(Layer::Tooltip);
        self.tooltip = None;
        let (Some(geometry), Ok(derived)) = (self.geometry.as_ref(), self.store.derived()) else { return };
        let config = self.store.config();
        if config.kind.has_lines() {
            let frame = Frame {
                config,
                derived,
                theme: &self.theme,
                host: self.host.as_ref(),
                width: self.scene.width,
                height: self.scene.height,
            };
            draw::redraw_marks(&frame, geometry, None, &mut self.scene);
        }
    }

    /// Parsed data as CSV, in the configured flavour.
    pub fn csv(&self) -> Result<String> {
        let derived = self.store.derived()?;
        let download = &self.store.config().download;
        if download.rfc4180 {
            to_csv_rfc4180(&derived.parsed_data, download.header)
        } else {
            Ok(to_csv(&derived.parsed_data, download.header))
        }
    }

    /// Offer the CSV to the host. Returns the filename used.
    pub fn export_csv(&self, filename: Option<&str>) -> Result<String> {
        let filename = match filename.or(self.store.config().download.filename.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("data_{}_{}.csv", self.id, chrono::Utc::now().timestamp_millis()),
        };
        let body = self.csv()?;
        self.host.offer_download(&filename, body.as_bytes())?;
        info!(container = %self.id, filename = %filename, bytes = body.len(), "csv exported");
        Ok(filename)
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn scene(&self) -> &Scene { &self.scene }

    pub fn to_svg(&self) -> String { self.scene.to_svg() }

    pub fn config(&self) -> &ChartConfig { self.store.config() }

    pub fn canonical(&self) -> Value { self.store.canonical() }

    pub fn derived(&self) -> std::result::Result<&Derived, DerivationError> { self.store.derived() }

    pub fn geometry(&self) -> Option<&PlotGeometry> { self.geometry.as_ref() }

    pub fn tooltip(&self) -> Option<&TooltipHit> { self.tooltip.as_ref() }

    pub fn store(&self) -> &ConfigStore { &self.store }
}
