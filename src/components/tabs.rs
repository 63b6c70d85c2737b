pub trait TabItem: Send {
    /// Id of the pane this item shows (its `data-tab`).
    fn target(&self) -> Option<String>;
    fn set_highlighted(&mut self, highlighted: bool);
}

pub trait TabPane: Send {
    fn id(&self) -> String;
    fn set_hidden(&mut self, hidden: bool);
}

/// Key-considerations menu: one highlighted item, one visible pane.
pub struct TabGroup<T, P> {
    items: Vec<T>,
    panes: Vec<P>,
    selected: usize,
}

impl<T: TabItem, P: TabPane> TabGroup<T, P> {
    /// Highlights the first item and shows only the first pane. Needs at
    /// least one of each.
    pub fn mount(mut items: Vec<T>, mut panes: Vec<P>) -> Option<Self> {
        if items.is_empty() || panes.is_empty() {
            return None;
        }
        for (i, item) in items.iter_mut().enumerate() {
            item.set_highlighted(i == 0);
        }
        for (i, pane) in panes.iter_mut().enumerate() {
            pane.set_hidden(i != 0);
        }
        Some(Self {
            items,
            panes,
            selected: 0,
        })
    }

    pub fn select(&mut self, index: usize) {
        let Some(target) = self.items.get(index).map(TabItem::target) else {
            return;
        };
        for item in self.items.iter_mut() {
            item.set_highlighted(false);
        }
        for pane in self.panes.iter_mut() {
            pane.set_hidden(true);
        }
        self.items[index].set_highlighted(true);
        self.selected = index;

        match target.and_then(|id| self.panes.iter_mut().find(|pane| pane.id() == id)) {
            Some(pane) => pane.set_hidden(false),
            None => tracing::warn!(index, "tab item has no matching content pane"),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }
}
