//! Funnel Layout - WASM Module
//!
//! Diagram layout engine for the funnel-builder canvas. It arranges a
//! directed graph of funnel stages, scores the quality of the current
//! geometry, and drives interactive positioning with undo/redo. It is
//! compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen; every module is also usable as a plain Rust library.
//!
//! # Architecture
//!
//! - `graph`: Node/edge model, petgraph-backed index, analysis primitives
//! - `spatial`: R-tree spatial indexing for proximity queries
//! - `layout`: Layout generators and post-processing
//! - `quality`: Layout scoring, defect detection and suggestions
//! - `interaction`: Drag snapping, new-node placement, integrity repair
//! - `engine`: Orchestrator state machine, history and transitions

use std::time::Duration;

use js_sys::Float32Array;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod engine;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod quality;
pub mod spatial;

use engine::{ArrangePreferences, LayoutEngine, LayoutOutcome};
use graph::{Edge, Node, NodeId, NodeKind, Position};
use interaction::{DragOptions, PlacementContext};
use layout::{LayoutAlgorithm, LayoutConfig, LayoutConfigPatch};
use quality::SuggestedAction;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Report a rejected operation to the browser console.
fn report_busy(operation: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("funnel-layout: {operation} ignored, a layout is in progress").into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!(operation, "ignored, a layout is in progress");
}

fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn error_to_js(error: error::LayoutError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Main entry point for the layout engine.
///
/// Holds the canvas' current graph snapshot alongside the orchestrator so
/// that animation frames and undo/redo can update positions in place.
#[wasm_bindgen]
pub struct FunnelLayoutWasm {
    engine: LayoutEngine,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Default for FunnelLayoutWasm {
    fn default() -> Self {
        Self::with_config(LayoutConfig::default())
    }
}

#[wasm_bindgen]
impl FunnelLayoutWasm {
    /// Create an engine. `config` is an optional camelCase `LayoutConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FunnelLayoutWasm, JsValue> {
        Ok(Self::with_config(from_js(config)?))
    }

    /// Replace the graph snapshot (nodes and edges arrays).
    #[wasm_bindgen(js_name = setGraph)]
    pub fn set_graph(&mut self, nodes: JsValue, edges: JsValue) -> Result<(), JsValue> {
        let nodes: Vec<Node> = from_js(nodes)?;
        let edges: Vec<Edge> = from_js(edges)?;
        self.replace_graph(nodes, edges);
        Ok(())
    }

    /// Replace the graph after an out-of-band edit, placing new nodes and
    /// closing gaps left by removed ones. Returns the repaired nodes.
    #[wasm_bindgen(js_name = syncGraph)]
    pub fn sync_graph(&mut self, nodes: JsValue, edges: JsValue) -> Result<JsValue, JsValue> {
        let nodes: Vec<Node> = from_js(nodes)?;
        let edges: Vec<Edge> = from_js(edges)?;
        self.sync(nodes, edges).map_err(error_to_js)?;
        to_js(&self.nodes)
    }

    /// Current nodes, including mid-animation positions.
    pub fn nodes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.nodes)
    }

    /// Lay out the graph. Returns the final nodes, or the unchanged nodes
    /// when the request was ignored or failed.
    #[wasm_bindgen(js_name = applyLayout)]
    pub fn apply_layout_js(&mut self, algorithm: JsValue, overrides: JsValue) -> Result<JsValue, JsValue> {
        let algorithm: Option<LayoutAlgorithm> = from_js(algorithm)?;
        let overrides: Option<LayoutConfigPatch> = from_js(overrides)?;
        let outcome = self.apply_layout(algorithm, overrides.as_ref());
        to_js(outcome.nodes().unwrap_or(&self.nodes))
    }

    #[wasm_bindgen(js_name = autoArrange)]
    pub fn auto_arrange_js(&mut self, preferences: JsValue) -> Result<JsValue, JsValue> {
        let preferences: ArrangePreferences = from_js(preferences)?;
        let outcome = self.auto_arrange(&preferences);
        to_js(outcome.nodes().unwrap_or(&self.nodes))
    }

    #[wasm_bindgen(js_name = optimizeSpacing)]
    pub fn optimize_spacing_js(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.optimize_spacing();
        to_js(outcome.nodes().unwrap_or(&self.nodes))
    }

    /// Run a suggestion's action, e.g. `{ "type": "optimize-spacing" }`.
    #[wasm_bindgen(js_name = applySuggestion)]
    pub fn apply_suggestion_js(&mut self, action: JsValue) -> Result<JsValue, JsValue> {
        let action: SuggestedAction = serde_wasm_bindgen::from_value(action)?;
        let outcome = self.apply_suggestion(action);
        to_js(outcome.nodes().unwrap_or(&self.nodes))
    }

    #[wasm_bindgen(js_name = analyzeCurrentLayout)]
    pub fn analyze_current_layout(&mut self) -> Result<JsValue, JsValue> {
        let analysis = self
            .engine
            .analyze_current_layout(&self.nodes, &self.edges)
            .map_err(error_to_js)?;
        to_js(&analysis)
    }

    /// Debounced analysis: `null` until the graph has been quiet for 100ms.
    #[wasm_bindgen(js_name = pollAnalysis)]
    pub fn poll_analysis(&mut self) -> Result<JsValue, JsValue> {
        match self.engine.poll_analysis(&self.nodes, &self.edges) {
            Some(analysis) => to_js(&analysis),
            None => Ok(JsValue::NULL),
        }
    }

    /// Adjust a live drag position. Returns `{ position, guides }`.
    #[wasm_bindgen(js_name = handleDragPosition)]
    pub fn handle_drag_position(&self, x: f64, y: f64, node_id: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options: Option<DragOptions> = from_js(options)?;
        let result = self.engine.handle_drag_position(
            Position::new(x, y),
            &NodeId::from(node_id),
            &self.nodes,
            options.as_ref(),
        );
        to_js(&result)
    }

    /// Propose a position for a new node. Returns `{ position, alternatives }`.
    #[wasm_bindgen(js_name = positionNewNode)]
    pub fn position_new_node(&self, node_type: &str, context: JsValue) -> Result<JsValue, JsValue> {
        let context: PlacementContext = from_js(context)?;
        let placement = self
            .engine
            .position_new_node(&self.nodes, &self.edges, &NodeKind::from(node_type), &context)
            .map_err(error_to_js)?;
        to_js(&placement)
    }

    /// Restore the previous history entry. Returns whether anything changed.
    #[wasm_bindgen(js_name = undoLayout)]
    pub fn undo_layout(&mut self) -> bool {
        self.undo()
    }

    #[wasm_bindgen(js_name = redoLayout)]
    pub fn redo_layout(&mut self) -> bool {
        self.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.engine.is_busy()
    }

    /// Merge a partial config. Returns the full config now in effect.
    #[wasm_bindgen(js_name = updateLayoutConfig)]
    pub fn update_layout_config(&mut self, patch: JsValue) -> Result<JsValue, JsValue> {
        let patch: LayoutConfigPatch = from_js(patch)?;
        to_js(self.engine.update_layout_config(&patch))
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.config())
    }

    /// Advance the running transition by `dt_ms`. Returns whether it is
    /// still running afterwards. A step too large for a `Duration` jumps
    /// to the end.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        match Duration::try_from_secs_f64(dt_ms.max(0.0) / 1000.0) {
            Ok(dt) => self.step(dt),
            Err(_) => {
                self.finish_animation();
                false
            }
        }
    }

    #[wasm_bindgen(js_name = finishAnimation)]
    pub fn finish_animation(&mut self) {
        if let Some(target) = self.engine.finish_animation() {
            self.nodes = target;
        }
    }

    /// Node positions as `[x0, y0, x1, y1, ...]`, in node order.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(&self.positions_flat()[..])
    }
}

impl FunnelLayoutWasm {
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            engine: LayoutEngine::new(config),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn current_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Take the caller's graph as-is. A running transition is dropped since
    /// its frames were computed for the previous node list.
    pub fn replace_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.engine.cancel_animation();
        self.nodes = nodes;
        self.edges = edges;
        self.engine.graph_changed();
    }

    pub fn sync(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> error::Result<()> {
        self.engine.cancel_animation();
        let repaired = self.engine.maintain_integrity(&self.nodes, &nodes, &edges)?;
        self.nodes = repaired;
        self.edges = edges;
        Ok(())
    }

    pub fn apply_layout(&mut self, algorithm: Option<LayoutAlgorithm>, overrides: Option<&LayoutConfigPatch>) -> LayoutOutcome {
        let outcome = self.engine.apply_layout(&self.nodes, &self.edges, algorithm, overrides);
        self.absorb("applyLayout", outcome)
    }

    pub fn auto_arrange(&mut self, preferences: &ArrangePreferences) -> LayoutOutcome {
        let outcome = self.engine.auto_arrange(&self.nodes, &self.edges, preferences);
        self.absorb("autoArrange", outcome)
    }

    pub fn optimize_spacing(&mut self) -> LayoutOutcome {
        let outcome = self.engine.optimize_spacing(&self.nodes, &self.edges);
        self.absorb("optimizeSpacing", outcome)
    }

    pub fn apply_suggestion(&mut self, action: SuggestedAction) -> LayoutOutcome {
        let outcome = self.engine.apply_suggestion(&self.nodes, &self.edges, action);
        self.absorb("applySuggestion", outcome)
    }

    pub fn undo(&mut self) -> bool {
        if self.engine.is_busy() {
            report_busy("undoLayout");
            return false;
        }
        match self.engine.undo_layout(&self.nodes) {
            Some(restored) => {
                self.nodes = restored;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.engine.is_busy() {
            report_busy("redoLayout");
            return false;
        }
        match self.engine.redo_layout(&self.nodes) {
            Some(restored) => {
                self.nodes = restored;
                true
            }
            None => false,
        }
    }

    pub fn step(&mut self, dt: Duration) -> bool {
        if let Some(frame) = self.engine.advance(dt) {
            self.nodes = frame;
        }
        self.engine.is_busy()
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        self.nodes
            .iter()
            .flat_map(|n| [n.position.x as f32, n.position.y as f32])
            .collect()
    }

    /// Apply an outcome to the held snapshot. Animated layouts update it
    /// frame by frame through [`FunnelLayoutWasm::step`].
    fn absorb(&mut self, operation: &str, outcome: LayoutOutcome) -> LayoutOutcome {
        match &outcome {
            LayoutOutcome::Applied(nodes) => self.nodes = nodes.clone(),
            LayoutOutcome::Ignored => report_busy(operation),
            LayoutOutcome::Animating(_) | LayoutOutcome::Failed { .. } => {}
        }
        outcome
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::quality::analyze_layout_quality;

    fn funnel_graph() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("landing", "start", 431.5, 12.25).with_label("Landing"),
            Node::new("optin", "step", 20.0, 640.0).with_label("Opt-in"),
            Node::new("upsell", "step", 800.0, 300.0).with_label("Upsell"),
            Node::new("downsell", "step", 777.0, 301.0).with_label("Downsell"),
            Node::new("thanks", "end", 5.0, 5.0).with_label("Thank you"),
        ];
        let edges = vec![
            Edge::new("e1", "landing", "optin"),
            Edge::new("e2", "optin", "upsell"),
            Edge::new("e3", "optin", "downsell"),
            Edge::new("e4", "upsell", "thanks"),
            Edge::new("e5", "downsell", "thanks"),
        ];
        (nodes, edges)
    }

    fn instant() -> FunnelLayoutWasm {
        FunnelLayoutWasm::with_config(LayoutConfig {
            animation_duration_ms: 0,
            ..LayoutConfig::default()
        })
    }

    #[test]
    fn test_apply_then_undo_restores_exact_positions() {
        let (nodes, edges) = funnel_graph();
        let mut session = instant();
        session.replace_graph(nodes.clone(), edges);

        assert!(matches!(session.apply_layout(None, None), LayoutOutcome::Applied(_)));
        let laid_out = session.current_nodes().to_vec();
        assert_ne!(laid_out, nodes);

        assert!(session.undo());
        for (restored, original) in session.current_nodes().iter().zip(&nodes) {
            assert_eq!(restored.position.x.to_bits(), original.position.x.to_bits());
            assert_eq!(restored.position.y.to_bits(), original.position.y.to_bits());
        }

        assert!(session.redo());
        assert_eq!(session.current_nodes(), &laid_out[..]);
    }

    #[test]
    fn test_layout_fixes_reported_problems() {
        let (nodes, edges) = funnel_graph();
        let before = analyze_layout_quality(&nodes, &edges).unwrap();
        assert!(!before.overlaps.is_empty());

        let mut session = instant();
        session.replace_graph(nodes, edges.clone());
        session.apply_layout(Some(LayoutAlgorithm::Hierarchical), None);

        let after = analyze_layout_quality(session.current_nodes(), &edges).unwrap();
        assert!(after.overlaps.is_empty());
        assert!(after.score > before.score);
        assert!(session.current_nodes().iter().all(|n| n.position.x >= 50.0 && n.position.y >= 50.0));
    }

    #[test]
    fn test_requests_during_animation_are_ignored() {
        let (nodes, edges) = funnel_graph();
        let mut session = FunnelLayoutWasm::default();
        session.replace_graph(nodes.clone(), edges);

        assert!(matches!(session.apply_layout(None, None), LayoutOutcome::Animating(_)));
        assert_eq!(session.optimize_spacing(), LayoutOutcome::Ignored);
        assert_eq!(session.auto_arrange(&ArrangePreferences::default()), LayoutOutcome::Ignored);
        assert!(!session.undo());
        // The snapshot only moves when frames are stepped
        assert_eq!(session.current_nodes(), &nodes[..]);

        while session.step(Duration::from_millis(16)) {}
        assert!(!session.engine().is_busy());
        assert!(session.undo());
        assert_eq!(session.current_nodes(), &nodes[..]);
    }

    #[test]
    fn test_failed_layout_leaves_graph_untouched() {
        let (nodes, mut edges) = funnel_graph();
        edges.push(Edge::new("broken", "thanks", "nowhere"));
        let mut session = instant();
        session.replace_graph(nodes.clone(), edges);

        assert!(matches!(session.apply_layout(None, None), LayoutOutcome::Failed { .. }));
        assert_eq!(session.current_nodes(), &nodes[..]);
        assert!(!session.engine().can_undo());
    }

    #[test]
    fn test_sync_places_new_node() {
        let (nodes, edges) = funnel_graph();
        let mut session = instant();
        session.replace_graph(nodes, edges.clone());
        session.apply_layout(None, None);

        let mut nodes = session.current_nodes().to_vec();
        nodes.push(Node::new("bonus", "step", 0.0, 0.0));
        let mut edges = edges;
        edges.push(Edge::new("e6", "thanks", "bonus"));
        session.sync(nodes, edges.clone()).unwrap();

        let analysis = analyze_layout_quality(session.current_nodes(), &edges).unwrap();
        assert!(analysis.overlaps.is_empty());
    }

    #[test]
    fn test_graph_edit_during_animation_survives() {
        let nodes = vec![Node::new("s", "start", 0.0, 0.0), Node::new("a", "step", 0.0, 0.0)];
        let edges = vec![Edge::new("e1", "s", "a")];
        let mut session = FunnelLayoutWasm::default();
        session.replace_graph(nodes, edges.clone());
        assert!(matches!(session.apply_layout(None, None), LayoutOutcome::Animating(_)));
        session.step(Duration::from_millis(16));

        let mut edited = session.current_nodes().to_vec();
        edited.push(Node::new("b", "step", 600.0, 600.0));
        let mut edges = edges;
        edges.push(Edge::new("e2", "a", "b"));
        session.replace_graph(edited.clone(), edges);

        assert!(!session.engine().is_busy());
        while session.step(Duration::from_millis(16)) {}
        assert_eq!(session.current_nodes(), &edited[..]);
        assert!(matches!(session.apply_layout(None, None), LayoutOutcome::Animating(_)));
        while session.step(Duration::from_millis(16)) {}
        assert_eq!(session.current_nodes().len(), 3);
    }

    #[test]
    fn test_sync_during_animation_keeps_added_node() {
        let (nodes, edges) = funnel_graph();
        let mut session = FunnelLayoutWasm::default();
        session.replace_graph(nodes, edges.clone());
        session.apply_layout(None, None);

        let mut nodes = session.current_nodes().to_vec();
        nodes.push(Node::new("bonus", "step", 0.0, 0.0));
        let mut edges = edges;
        edges.push(Edge::new("e6", "thanks", "bonus"));
        session.sync(nodes, edges).unwrap();

        assert!(!session.step(Duration::from_millis(16)));
        assert!(session.current_nodes().iter().any(|n| n.id.as_str() == "bonus"));
    }

    #[test]
    fn test_unbounded_advance_jumps_to_end() {
        let (nodes, edges) = funnel_graph();
        let mut session = FunnelLayoutWasm::default();
        session.replace_graph(nodes, edges);
        let LayoutOutcome::Animating(target) = session.apply_layout(None, None) else {
            panic!("expected an animation");
        };

        assert!(!session.advance(f64::INFINITY));
        assert_eq!(session.current_nodes(), &target[..]);
        assert!(!session.engine().is_busy());
        assert!(!session.advance(f64::NAN));
        assert!(!session.advance(f64::MAX));
    }

    #[test]
    fn test_positions_are_flattened_in_node_order() {
        let mut session = instant();
        session.replace_graph(
            vec![Node::new("a", "start", 1.0, 2.0), Node::new("b", "end", 3.0, 4.0)],
            Vec::new(),
        );
        assert_eq!(session.positions_flat(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
