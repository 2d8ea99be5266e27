//! Session state: the input palette, the transform parameters and the output
//! palette derived from them.

use std::fmt;

use tracing::{debug, info};

use crate::color::Color;
use crate::error::Result;
use crate::params::{ParamUpdate, TransformParams};
use crate::pipeline::{extract, substitute, transform};
use crate::store::{EntryId, Palette};

/// Callback fired after the input palette has been replaced wholesale.
pub type PaletteListener = Box<dyn FnMut(&Palette)>;

/// Owns all session state. The output palette is recomputed on every change
/// and a change is only committed once the recomputation succeeds.
pub struct App {
    params: TransformParams,
    input: Palette,
    output: Palette,
    listeners: Vec<PaletteListener>,
    replaced_pending: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            params: TransformParams::default(),
            input: Palette::new(),
            output: Palette::new(),
            listeners: Vec::new(),
            replaced_pending: false,
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("params", &self.params)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("listeners", &self.listeners.len())
            .field("replaced_pending", &self.replaced_pending)
            .finish()
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from existing colours and parameters.
    pub fn with_state(input: Palette, params: TransformParams) -> Result<Self> {
        let mut app = Self::new();
        app.commit(input, params)?;
        Ok(app)
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    pub fn input(&self) -> &Palette {
        &self.input
    }

    pub fn output(&self) -> &Palette {
        &self.output
    }

    fn commit(&mut self, input: Palette, params: TransformParams) -> Result<()> {
        let output = transform(&params, &input)?;
        self.input = input;
        self.params = params;
        self.output = output;
        Ok(())
    }

    fn commit_input(&mut self, input: Palette) -> Result<()> {
        self.commit(input, self.params)
    }

    /// Append a colour and return its id. The value must be valid hex.
    pub fn add_colour(&mut self, value: &str) -> Result<EntryId> {
        Color::from_hex(value)?;
        let input = self.input.add(value);
        let id = input.entries().last().map(|e| e.id).unwrap_or_default();
        self.commit_input(input)?;
        Ok(id)
    }

    pub fn add_default(&mut self) -> Result<EntryId> {
        let input = self.input.add_default();
        let id = input.entries().last().map(|e| e.id).unwrap_or_default();
        self.commit_input(input)?;
        Ok(id)
    }

    pub fn remove_colour(&mut self, id: EntryId) -> Result<()> {
        self.commit_input(self.input.remove(id))
    }

    /// Change an entry's colour. The value must be valid hex.
    pub fn update_colour(&mut self, id: EntryId, value: &str) -> Result<()> {
        Color::from_hex(value)?;
        self.commit_input(self.input.update(id, value))
    }

    pub fn reorder(&mut self, order: &[EntryId]) -> Result<()> {
        let input = self.input.reorder(order)?;
        self.commit_input(input)
    }

    /// Move an entry `delta` places, stopping at either end.
    pub fn move_colour(&mut self, id: EntryId, delta: isize) -> Result<()> {
        let Some(from) = self.input.position(id) else {
            debug!(%id, "move: no such entry");
            return Ok(());
        };
        let last = self.input.len() as isize - 1;
        let to = (from as isize + delta).clamp(0, last) as usize;
        if to == from {
            return Ok(());
        }
        let mut order = self.input.ids();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.reorder(&order)
    }

    pub fn clear(&mut self) {
        self.input = self.input.clear();
        self.output = Palette::new();
    }

    pub fn update_param(&mut self, update: ParamUpdate) -> Result<()> {
        let params = self.params.with(update);
        self.commit(self.input.clone(), params)
    }

    /// Append the distinct colours found in `text`, returning how many were
    /// added.
    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let found = extract(text);
        let count = found.len();
        self.commit_input(self.input.append(&found))?;
        info!(count, "imported colours from text");
        Ok(count)
    }

    /// Rewrite the input colours appearing in `text` to their outputs.
    pub fn convert_text(&self, text: &str) -> Result<String> {
        substitute(text, &self.input, &self.output)
    }

    /// Make the current output the new input, under fresh ids.
    ///
    /// Listeners registered with [`on_palette_replaced`](Self::on_palette_replaced)
    /// run on the next [`dispatch_pending`](Self::dispatch_pending).
    pub fn iterate(&mut self) -> Result<()> {
        let input = self.input.replace_all(self.output.reissued().entries().to_vec());
        self.commit_input(input)?;
        self.replaced_pending = true;
        info!(colours = self.input.len(), "output adopted as input");
        Ok(())
    }

    pub fn on_palette_replaced(&mut self, listener: impl FnMut(&Palette) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Fire queued palette-replaced notifications. Call once the new state
    /// has been presented. Returns whether anything was dispatched.
    pub fn dispatch_pending(&mut self) -> bool {
        if !self.replaced_pending {
            return false;
        }
        self.replaced_pending = false;
        for listener in &mut self.listeners {
            listener(&self.input);
        }
        true
    }
}
