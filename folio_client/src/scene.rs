//! Settings of the decorative 3D background, owned by the top-level screen and
//! passed down by reference.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A page section the viewer can scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    About,
    Experience,
    Education,
    Projects,
    SchoolProjects,
    Tech,
    Contact,
}

impl Section {
    pub const ALL: [Self; 8] = [
        Self::Hero,
        Self::About,
        Self::Experience,
        Self::Education,
        Self::Projects,
        Self::SchoolProjects,
        Self::Tech,
        Self::Contact,
    ];

    /// The element id used as navigation anchor.
    pub fn id(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Projects => "projects",
            Self::SchoolProjects => "school-projects",
            Self::Tech => "tech",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSection;

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.id() == s)
            .ok_or(UnknownSection)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MousePosition {
    pub x: f64,
    pub y: f64,
}

/// Handle of a 3D object mounted inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneObjectId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub enable_interactions: bool,
    pub quality: Quality,
    pub show_wireframes: bool,
    pub active_section: Option<Section>,
    section_objects: HashMap<Section, Vec<SceneObjectId>>,
    pub is_interacting: bool,
    pub mouse_position: MousePosition,
    pub frame_rate: u32,
    pub max_objects: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            enable_interactions: true,
            quality: Quality::Medium,
            show_wireframes: false,
            active_section: None,
            section_objects: HashMap::new(),
            is_interacting: false,
            mouse_position: MousePosition::default(),
            frame_rate: 60,
            max_objects: 50,
        }
    }
}

impl SceneSettings {
    /// The objects currently mounted in `section`, in mount order.
    pub fn section_objects(&self, section: Section) -> &[SceneObjectId] {
        self.section_objects
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn add_section_object(&mut self, section: Section, object: SceneObjectId) {
        self.section_objects.entry(section).or_default().push(object);
    }

    /// Removes every occurrence of `object` from `section`.
    pub fn remove_section_object(&mut self, section: Section, object: SceneObjectId) {
        if let Some(objects) = self.section_objects.get_mut(&section) {
            objects.retain(|&x| x != object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = SceneSettings::default();

        assert!(settings.enable_interactions);
        assert_eq!(settings.quality, Quality::Medium);
        assert_eq!(settings.active_section, None);
        assert_eq!(settings.frame_rate, 60);
        assert_eq!(settings.max_objects, 50);
    }

    #[test]
    fn section_objects() {
        let mut settings = SceneSettings::default();
        assert!(settings.section_objects(Section::Hero).is_empty());

        settings.add_section_object(Section::Hero, SceneObjectId(1));
        settings.add_section_object(Section::Hero, SceneObjectId(2));
        settings.add_section_object(Section::Hero, SceneObjectId(1));
        settings.add_section_object(Section::Tech, SceneObjectId(3));

        assert_eq!(
            settings.section_objects(Section::Hero),
            [SceneObjectId(1), SceneObjectId(2), SceneObjectId(1)]
        );

        settings.remove_section_object(Section::Hero, SceneObjectId(1));
        settings.remove_section_object(Section::About, SceneObjectId(3));

        assert_eq!(settings.section_objects(Section::Hero), [SceneObjectId(2)]);
        assert_eq!(settings.section_objects(Section::Tech), [SceneObjectId(3)]);
        assert!(settings.section_objects(Section::About).is_empty());
    }

    #[test]
    fn section_ids() {
        for section in Section::ALL {
            assert_eq!(section.id().parse::<Section>(), Ok(section));
        }
        assert_eq!(
            "school-projects".parse::<Section>(),
            Ok(Section::SchoolProjects)
        );
        assert_eq!("blog".parse::<Section>(), Err(UnknownSection));
    }
}
