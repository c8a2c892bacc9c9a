//! Markup rendering of a [`MetadataInfo`].
//!
//! The document is the module's externally discoverable interface and is
//! diffed across builds, so rendering is fully deterministic: element order
//! is declaration order, field order within an element is fixed, and each
//! nesting level is one tab.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <metadata version="0.4">
//! 	<class>
//! 		<name>Depression</name>
//! 		...
//! 	</class>
//! 	<information> ... </information>
//! 	<parameters> <parameter> ... </parameters>
//! 	<inputs> <input> ... </inputs>
//! 	<outputs> <output> ... </outputs>
//! 	<inoutputs> <inoutput> ... </inoutputs>
//! 	<dependencies> <class> ... </dependencies>
//! </metadata>
//! ```

use crate::metadata::{ClassDescriptor, MetadataInfo, VariableDescriptor};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Line-oriented writer for the metadata document.
struct XmlWriter {
    out: String,
}

impl XmlWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn open_tag(&mut self, name: &str, attributes: &str, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(name);
        if !attributes.is_empty() {
            self.out.push(' ');
            self.out.push_str(attributes);
        }
        self.out.push_str(">\n");
    }

    fn close_tag(&mut self, name: &str, depth: usize) {
        self.indent(depth);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    /// `<name>content</name>` on a single line.
    fn full_tag(&mut self, name: &str, content: &str, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self.out.push_str(&escape(content));
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    fn class_block(&mut self, tag: &str, class: &ClassDescriptor, depth: usize) {
        self.open_tag(tag, "", depth);
        self.full_tag("name", &class.name, depth + 1);
        self.full_tag("description", &class.description, depth + 1);
        self.close_tag(tag, depth);
    }

    fn variable_block(&mut self, tag: &str, var: &VariableDescriptor, depth: usize) {
        self.open_tag(tag, "", depth);
        self.full_tag("name", &var.name, depth + 1);
        self.full_tag("units", &var.units, depth + 1);
        self.full_tag("description", &var.description, depth + 1);
        if let Some(source) = &var.source {
            self.full_tag("source", source, depth + 1);
        }
        self.full_tag("dimension", var.dimension.name(), depth + 1);
        if let Some(transfer) = var.transfer {
            self.full_tag("transfer", transfer.name(), depth + 1);
        }
        self.close_tag(tag, depth);
    }

    fn variable_list(&mut self, block: &str, tag: &str, vars: &[VariableDescriptor], depth: usize) {
        self.open_tag(block, "", depth);
        for var in vars {
            self.variable_block(tag, var, depth + 1);
        }
        self.close_tag(block, depth);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Escapes the five XML special characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl MetadataInfo {
    /// Renders the registry as a versioned XML document.
    pub fn xml_document(&self) -> String {
        let mut w = XmlWriter::new();
        w.out.push_str(XML_HEADER);
        w.out.push('\n');

        let version = format!("version=\"{}\"", escape(self.schema_version()));
        w.open_tag("metadata", &version, 0);

        w.class_block("class", self.class(), 1);

        let info = self.information();
        w.open_tag("information", "", 1);
        w.full_tag("id", &info.id, 2);
        w.full_tag("name", &info.name, 2);
        w.full_tag("description", &info.description, 2);
        w.full_tag("version", &info.version, 2);
        w.full_tag("author", &info.author, 2);
        w.full_tag("email", &info.email, 2);
        w.full_tag("website", &info.website, 2);
        w.full_tag("helpfile", &info.helpfile, 2);
        w.close_tag("information", 1);

        w.variable_list("parameters", "parameter", self.parameters(), 1);
        w.variable_list("inputs", "input", self.inputs(), 1);
        w.variable_list("outputs", "output", self.outputs(), 1);
        w.variable_list("inoutputs", "inoutput", self.in_outputs(), 1);

        w.open_tag("dependencies", "", 1);
        for dep in self.dependencies() {
            w.class_block("class", dep, 2);
        }
        w.close_tag("dependencies", 1);

        w.close_tag("metadata", 0);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dimension, TransferMode};

    #[test]
    fn test_empty_registry_renders_all_blocks() {
        let doc = MetadataInfo::new().xml_document();
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<metadata version=\"0.4\">
\t<class>
\t\t<name></name>
\t\t<description></description>
\t</class>
\t<information>
\t\t<id></id>
\t\t<name></name>
\t\t<description></description>
\t\t<version></version>
\t\t<author></author>
\t\t<email></email>
\t\t<website></website>
\t\t<helpfile></helpfile>
\t</information>
\t<parameters>
\t</parameters>
\t<inputs>
\t</inputs>
\t<outputs>
\t</outputs>
\t<inoutputs>
\t</inoutputs>
\t<dependencies>
\t</dependencies>
</metadata>
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_entries_render_fields_in_order() {
        let mut md = MetadataInfo::new();
        md.add_parameter("Depre_in", "none", "coefficient", "ParameterDB", Dimension::Single);
        md.add_input("PET", "mm", "pet", "Module", Dimension::Raster1D, TransferMode::Distributed);
        md.add_output_whole("DPST", "mm", "storage", Dimension::Raster1D);
        md.add_dependency("Interception", "upstream");
        let doc = md.xml_document();

        let parameter = "\
\t<parameters>
\t\t<parameter>
\t\t\t<name>Depre_in</name>
\t\t\t<units>none</units>
\t\t\t<description>coefficient</description>
\t\t\t<source>ParameterDB</source>
\t\t\t<dimension>DT_Single</dimension>
\t\t</parameter>
\t</parameters>
";
        assert!(doc.contains(parameter), "{}", doc);

        let input = "\
\t\t<input>
\t\t\t<name>PET</name>
\t\t\t<units>mm</units>
\t\t\t<description>pet</description>
\t\t\t<source>Module</source>
\t\t\t<dimension>DT_Raster1D</dimension>
\t\t\t<transfer>TF_Distributed</transfer>
\t\t</input>
";
        assert!(doc.contains(input), "{}", doc);

        let output = "\
\t\t<output>
\t\t\t<name>DPST</name>
\t\t\t<units>mm</units>
\t\t\t<description>storage</description>
\t\t\t<dimension>DT_Raster1D</dimension>
\t\t\t<transfer>TF_Whole</transfer>
\t\t</output>
";
        assert!(doc.contains(output), "{}", doc);

        let dependency = "\
\t<dependencies>
\t\t<class>
\t\t\t<name>Interception</name>
\t\t\t<description>upstream</description>
\t\t</class>
\t</dependencies>
";
        assert!(doc.contains(dependency), "{}", doc);
    }

    #[test]
    fn test_block_order_follows_declaration_order() {
        let mut md = MetadataInfo::new();
        md.add_output_whole("B", "", "", Dimension::Raster1D);
        md.add_output_whole("A", "", "", Dimension::Raster1D);
        let doc = md.xml_document();
        let b = doc.find("<name>B</name>").unwrap();
        let a = doc.find("<name>A</name>").unwrap();
        assert!(b < a);

        let params = doc.find("<parameters>").unwrap();
        let inputs = doc.find("<inputs>").unwrap();
        let outputs = doc.find("<outputs>").unwrap();
        let inouts = doc.find("<inoutputs>").unwrap();
        let deps = doc.find("<dependencies>").unwrap();
        assert!(params < inputs && inputs < outputs && outputs < inouts && inouts < deps);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let build = || {
            let mut md = MetadataInfo::new();
            md.set_class("Depression", "Calculate depression storage.");
            md.add_in_output("SOMO", "mm", "soil", "Module", Dimension::Raster2D, TransferMode::SingleValue);
            md
        };
        assert_eq!(build().xml_document(), build().xml_document());
    }

    #[test]
    fn test_text_is_escaped() {
        let mut md = MetadataInfo::new();
        md.set_description("fill & spill <simple>");
        let doc = md.xml_document();
        assert!(doc.contains("<description>fill &amp; spill &lt;simple&gt;</description>"));
    }
}
