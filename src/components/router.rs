use std::borrow::Cow;

use url::Url;

use crate::error::SiteError;

#[cfg(test)]
use mockall::automock;

/// A top-level content section of the page.
#[cfg_attr(test, automock)]
pub trait SectionElement: Send {
    fn id(&self) -> String;
    fn set_active(&mut self, active: bool);
}

/// An entry in the main navigation, pointing at `#<section id>`.
#[cfg_attr(test, automock)]
pub trait NavLink: Send {
    fn href(&self) -> String;
    fn set_selected(&mut self, selected: bool);
}

/// Shows exactly one content section, picked from the URL fragment.
pub struct SectionRouter<S: SectionElement, L: NavLink> {
    sections: Vec<S>,
    links: Vec<L>,
    default_id: String,
    active: String,
}

impl<S: SectionElement, L: NavLink> SectionRouter<S, L> {
    /// Builds the router and activates the default section.
    pub fn new(sections: Vec<S>, links: Vec<L>, default_id: &str) -> Result<Self, SiteError> {
        if sections.is_empty() {
            return Err(SiteError::NoSections);
        }
        if !sections.iter().any(|section| section.id() == default_id) {
            return Err(SiteError::UnknownDefaultSection(default_id.to_string()));
        }
        let mut router = Self {
            sections,
            links,
            default_id: default_id.to_string(),
            active: String::new(),
        };
        router.activate(default_id.to_string());
        Ok(router)
    }

    /// Initial page load. Accepts an absolute URL or anything ending in `#fragment`.
    pub fn load(&mut self, location: &str) -> &str {
        let fragment = match Url::parse(location) {
            Ok(url) => url.fragment().map(str::to_string),
            Err(_) => location.split_once('#').map(|(_, fragment)| fragment.to_string()),
        };
        let target = self.resolve(fragment.as_deref());
        self.activate(target);
        &self.active
    }

    /// `hashchange` with the new `location.hash`, e.g. `#roadmap` or empty.
    pub fn hash_changed(&mut self, hash: &str) -> &str {
        let target = self.resolve(Some(hash.trim_start_matches('#')));
        self.activate(target);
        &self.active
    }

    /// Click on a nav link with the given `href`.
    pub fn nav_clicked(&mut self, href: &str) -> &str {
        let fragment = href.split_once('#').map(|(_, fragment)| fragment);
        let target = self.resolve(fragment);
        self.activate(target);
        &self.active
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn sections(&self) -> &[S] {
        &self.sections
    }

    fn resolve(&self, fragment: Option<&str>) -> String {
        let Some(raw) = fragment.filter(|f| !f.is_empty()) else {
            return self.default_id.clone();
        };
        let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
        if self.sections.iter().any(|section| section.id() == decoded) {
            decoded.into_owned()
        } else {
            tracing::debug!(fragment = raw, "unknown section fragment, using default");
            self.default_id.clone()
        }
    }

    fn activate(&mut self, id: String) {
        for section in self.sections.iter_mut() {
            section.set_active(false);
        }
        if let Some(section) = self.sections.iter_mut().find(|section| section.id() == id) {
            section.set_active(true);
        }
        let target_href = format!("#{}", id);
        for link in self.links.iter_mut() {
            let selected = link.href() == target_href;
            link.set_selected(selected);
        }
        self.active = id;
    }
}
