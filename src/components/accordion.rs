#[cfg(test)]
use mockall::automock;

/// Collapsible content driven by an explicit max-height transition.
#[cfg_attr(test, automock)]
pub trait AccordionPanel: Send {
    fn scroll_height(&self) -> f64;
    /// `Some` opens the panel at that height, `None` clears it (closed).
    fn set_max_height(&mut self, height: Option<f64>);
}

#[cfg_attr(test, automock)]
pub trait ToggleIcon: Send {
    fn set_expanded(&mut self, expanded: bool);
}

/// One toggle control with the panel and icon it owns. Either may be absent
/// in the markup.
pub struct AccordionItem<P, I> {
    panel: Option<P>,
    icon: Option<I>,
    open: bool,
}

impl<P: AccordionPanel, I: ToggleIcon> AccordionItem<P, I> {
    pub fn new(panel: Option<P>, icon: Option<I>) -> Self {
        Self {
            panel,
            icon,
            open: false,
        }
    }

    fn set_open(&mut self, open: bool) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if open {
            let height = panel.scroll_height();
            panel.set_max_height(Some(height));
        } else {
            panel.set_max_height(None);
        }
        if let Some(icon) = self.icon.as_mut() {
            icon.set_expanded(open);
        }
        self.open = open;
    }
}

/// A group of panels of which at most one is open.
pub struct Accordion<P, I> {
    items: Vec<AccordionItem<P, I>>,
}

impl<P: AccordionPanel, I: ToggleIcon> Accordion<P, I> {
    pub fn new(items: Vec<AccordionItem<P, I>>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Click on toggle `index`. Returns whether its panel is open afterwards.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            tracing::debug!(index, "accordion toggle out of range");
            return false;
        };
        if item.panel.is_none() {
            tracing::debug!(index, "accordion toggle without a panel ignored");
            return false;
        }
        if item.open {
            self.items[index].set_open(false);
            false
        } else {
            self.open_exclusive(index);
            true
        }
    }

    /// Opens `index` if it is closed.
    pub fn expand(&mut self, index: usize) {
        if !self.is_open(index) {
            self.toggle(index);
        }
    }

    /// Re-measures an open panel after its content changed.
    pub fn refresh_height(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            if item.open {
                item.set_open(true);
            }
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.items.get(index).map(|item| item.open).unwrap_or(false)
    }

    pub fn open_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.open)
    }

    fn open_exclusive(&mut self, index: usize) {
        for (i, item) in self.items.iter_mut().enumerate() {
            if i != index && item.open {
                item.set_open(false);
            }
        }
        self.items[index].set_open(true);
    }
}
