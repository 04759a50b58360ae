//! Built-in G-Code program templates

use serde::Serialize;

/// Id of the template used as the default program
pub const SAMPLE_TEMPLATE_ID: &str = "sample";

/// A named, ready-to-run program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcodeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub gcode: &'static str,
}

impl GcodeTemplate {
    /// File name used when the template is loaded into the editor
    pub fn file_name(&self) -> String {
        format!("{}.nc", self.id)
    }
}

/// Collection of built-in templates
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<GcodeTemplate>,
}

impl TemplateLibrary {
    /// Library holding the built-in machining templates
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                GcodeTemplate {
                    id: "facing",
                    name: "Face Milling",
                    description: "Surface facing operation - 100x100mm workpiece",
                    gcode: include_str!("../../templates/facing.nc"),
                },
                GcodeTemplate {
                    id: "pocket",
                    name: "Pocket Milling",
                    description: "Rectangular pocket - 60x40mm, 8mm deep",
                    gcode: include_str!("../../templates/pocket.nc"),
                },
                GcodeTemplate {
                    id: "drilling",
                    name: "Drilling Pattern",
                    description: "4x4 hole pattern - 6mm holes, 15mm deep",
                    gcode: include_str!("../../templates/drilling.nc"),
                },
                GcodeTemplate {
                    id: "contour",
                    name: "Contour Cut",
                    description: "Profile cut with arcs - complex shape",
                    gcode: include_str!("../../templates/contour.nc"),
                },
                GcodeTemplate {
                    id: SAMPLE_TEMPLATE_ID,
                    name: "Sample Program",
                    description: "Quick demo - square pocket with circle",
                    gcode: include_str!("../../templates/sample.nc"),
                },
            ],
        }
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Option<&GcodeTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// All templates in display order
    pub fn list(&self) -> &[GcodeTemplate] {
        &self.templates
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.id).collect()
    }

    /// Program text loaded when nothing else is available
    pub fn default_program(&self) -> &'static str {
        self.get(SAMPLE_TEMPLATE_ID).map(|t| t.gcode).unwrap_or("")
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids() {
        let library = TemplateLibrary::builtin();
        assert_eq!(
            library.ids(),
            vec!["facing", "pocket", "drilling", "contour", "sample"]
        );
    }

    #[test]
    fn test_get_and_file_name() {
        let library = TemplateLibrary::builtin();
        let template = library.get("contour").unwrap();
        assert_eq!(template.name, "Contour Cut");
        assert_eq!(template.file_name(), "contour.nc");
        assert!(template.gcode.contains("G2"));
        assert!(library.get("helix").is_none());
    }

    #[test]
    fn test_default_program_is_sample() {
        let library = TemplateLibrary::builtin();
        assert!(library.default_program().starts_with("; Sample CNC Program"));
    }
}
