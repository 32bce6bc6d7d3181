use crate::{
    datatypes::{Material, Model, Node},
    error::ConverterError,
};

const MATERIALS_MARKER: &str = "/* MATERIALS */";
const NODES_MARKER: &str = "/* NODES */";

/// Splits a STEP instance line on the structural punctuation and drops
/// empty tokens
fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| matches!(c, ',' | '\'' | '(' | ')'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Collects the run of `#`-prefixed lines immediately following a section
/// marker. A missing marker yields an empty section.
///
/// The marker must match verbatim. Collected lines are trimmed; any line
/// that does not start with `#` after trimming ends the run, including a
/// whitespace-only one.
///
/// # Arguments
/// * `lines` - The non-empty lines of the stp file
/// * `marker` - The literal marker line, e.g. `/* NODES */`
///
/// # Returns
/// The qualifying lines of the section, in file order
fn collect_section<'a>(lines: &[&'a str], marker: &str) -> Vec<&'a str> {
    let marker_index = match lines.iter().position(|line| *line == marker) {
        Some(i) => i,
        None => return Vec::new(),
    };

    lines[marker_index + 1..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| line.starts_with('#'))
        .collect()
}

/// Parses a material line into a Material record
///
/// Token 1 is the material number and token 2 the material name, e.g.
/// `#10=MATERIAL('S235','Structural Steel');` yields ("S235",
/// "Structural Steel").
fn parse_material_line(line: &str) -> Result<Material, ConverterError> {
    let tokens = tokenize(line);

    if tokens.len() < 3 {
        return Err(ConverterError::Parse(format!(
            "Material line has {} fields, expected at least 3: {}",
            tokens.len(),
            line
        )));
    }

    Ok(Material {
        no: tokens[1].to_string(),
        name: tokens[2].to_string(),
    })
}

/// Parses a vertex line into coordinates in meters
///
/// The coordinates are the last three numeric tokens on the line, which
/// anchors on the coordinate list itself and holds whether the STEP label
/// is empty, alphabetic, or itself numeric. Indexing by fixed position
/// would break on lines with an empty label, since `''` produces no token.
/// Values are in millimeters in the source; negative zero counts as plain
/// zero.
fn parse_vertex_line(line: &str) -> Result<[f64; 3], ConverterError> {
    let tokens = tokenize(line);

    let mut values_mm: Vec<f64> = Vec::new();
    for token in tokens.iter().skip(1) {
        if let Ok(value) = token.trim().parse::<f64>() {
            values_mm.push(if value == 0.0 { 0.0 } else { value });
        }
    }

    if values_mm.len() < 3 {
        return Err(ConverterError::Parse(format!(
            "Vertex line has fewer than 3 coordinates: {}",
            line
        )));
    }

    let mut coordinates_m = [0.0f64; 3];
    let coordinates_mm = &values_mm[values_mm.len() - 3..];

    for (coordinate, value_mm) in coordinates_m.iter_mut().zip(coordinates_mm.iter().copied()) {
        *coordinate = value_mm / 1000.0;
    }

    Ok(coordinates_m)
}

/// Extracts the node identifier from a node line
///
/// The identifier is the entity reference token, the first token after the
/// keyword that starts with `#`.
fn parse_node_line(line: &str) -> Result<String, ConverterError> {
    let tokens = tokenize(line);

    match tokens.iter().skip(1).find(|t| t.starts_with('#')) {
        Some(reference) => Ok(reference.to_string()),
        None => Err(ConverterError::Parse(format!(
            "Node line has no entity reference: {}",
            line
        ))),
    }
}

/// Parses stp file contents into a Model
///
/// # Arguments
/// * `contents` - The full text of the stp file
///
/// # Returns
/// A Model with the materials and nodes of the marked sections
pub fn parse_model(contents: &str) -> Result<Model, ConverterError> {
    let lines: Vec<&str> = contents.lines().filter(|line| !line.is_empty()).collect();

    let mut materials: Vec<Material> = Vec::new();
    for line in collect_section(&lines, MATERIALS_MARKER) {
        materials.push(parse_material_line(line)?);
    }

    let node_lines = collect_section(&lines, NODES_MARKER);
    if node_lines.len() % 2 != 0 {
        return Err(ConverterError::Parse(format!(
            "Nodes section has {} lines; expected vertex/node pairs",
            node_lines.len()
        )));
    }

    let mut nodes: Vec<Node> = Vec::with_capacity(node_lines.len() / 2);
    for pair in node_lines.chunks(2) {
        let coordinates = parse_vertex_line(pair[0])?;
        let no = parse_node_line(pair[1])?;

        nodes.push(Node { no, coordinates });
    }

    Ok(Model { materials, nodes })
}

/// Runs the parser on an stp file
///
/// # Arguments
/// * `stp_file` - The path to the input stp file
///
/// # Returns
/// The parsed Model
pub fn run(stp_file: &str) -> Result<Model, ConverterError> {
    let contents = match std::fs::read_to_string(stp_file) {
        Ok(c) => c,
        Err(err) => {
            return Err(ConverterError::Input(format!(
                "Unable to open stp file {}: {}",
                stp_file, err
            )))
        }
    };

    let model = parse_model(&contents)?;

    println!(
        "info: loaded {} materials and {} nodes from {}",
        model.materials.len(),
        model.nodes.len(),
        stp_file
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_material_line() {
        let tokens = tokenize("#10=MATERIAL('S235','Structural Steel');");
        assert_eq!(
            tokens,
            vec!["#10=MATERIAL", "S235", "Structural Steel", ";"]
        );
    }

    #[test]
    fn test_parse_material_line() {
        let material = parse_material_line("#10=MATERIAL('S235','Structural Steel');").unwrap();
        assert_eq!(material.no, "S235");
        assert_eq!(material.name, "Structural Steel");
    }

    #[test]
    fn test_parse_material_line_undersized() {
        let result = parse_material_line("#10=MATERIAL();");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_vertex_line_empty_label() {
        let coordinates = parse_vertex_line("#1=CARTESIAN_POINT('',(1000.,2000.,-0.));").unwrap();
        assert_eq!(coordinates, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_parse_vertex_line_with_label() {
        let coordinates = parse_vertex_line("#1=CARTESIAN_POINT('P1',(500.,-250.,0.));").unwrap();
        assert_eq!(coordinates, [0.5, -0.25, 0.0]);
    }

    #[test]
    fn test_parse_vertex_line_numeric_label() {
        let coordinates = parse_vertex_line("#1=CARTESIAN_POINT('12',(1000.,2000.,0.));").unwrap();
        assert_eq!(coordinates, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_parse_vertex_line_negative_zero() {
        let coordinates = parse_vertex_line("#1=CARTESIAN_POINT('',(-0.,-0.,-0.));").unwrap();

        for coordinate in coordinates {
            assert_eq!(coordinate, 0.0);
            assert!(coordinate.is_sign_positive());
        }
    }

    #[test]
    fn test_parse_vertex_line_non_numeric() {
        let result = parse_vertex_line("#1=CARTESIAN_POINT('',(1000.,abc,0.));");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_node_line() {
        assert_eq!(parse_node_line("#2=VERTEX('',#1);").unwrap(), "#1");
        assert_eq!(parse_node_line("#2=VERTEX('V1',#1);").unwrap(), "#1");
    }

    #[test]
    fn test_parse_node_line_missing_reference() {
        let result = parse_node_line("#2=VERTEX('V1',12);");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_model_missing_sections() {
        let model = parse_model("ISO-10303-21;\nHEADER;\nENDSEC;\n").unwrap();
        assert!(model.materials.is_empty());
        assert!(model.nodes.is_empty());
    }

    #[test]
    fn test_parse_model_section_ends_at_non_qualifying_line() {
        let contents = "\
/* MATERIALS */
#10=MATERIAL('S235','Structural Steel');
ENDSEC;
#11=MATERIAL('S355','Structural Steel');
";
        let model = parse_model(contents).unwrap();
        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.materials[0].no, "S235");
    }

    #[test]
    fn test_parse_model_section_ends_at_whitespace_only_line() {
        let contents = "\
/* MATERIALS */
#10=MATERIAL('S235','Structural Steel');
   \t
#11=MATERIAL('S355','Structural Steel');
";
        let model = parse_model(contents).unwrap();
        assert_eq!(model.materials.len(), 1);
    }

    #[test]
    fn test_parse_model_marker_matched_verbatim() {
        let contents = "  /* MATERIALS */
#10=MATERIAL('S235','Structural Steel');
";
        let model = parse_model(contents).unwrap();
        assert!(model.materials.is_empty());
    }

    #[test]
    fn test_parse_model_odd_node_lines() {
        let contents = "\
/* NODES */
#1=CARTESIAN_POINT('',(1000.,2000.,-0.));
#2=VERTEX('',#1);
#3=CARTESIAN_POINT('',(0.,0.,0.));
";
        let result = parse_model(contents);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_model_pairs_in_order() {
        let contents = "\
/* NODES */
#1=CARTESIAN_POINT('',(1000.,2000.,-0.));
#2=VERTEX('',#1);
#3=CARTESIAN_POINT('',(0.,0.,3000.));
#4=VERTEX('',#3);
";
        let model = parse_model(contents).unwrap();
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.nodes[0].no, "#1");
        assert_eq!(model.nodes[0].coordinates, [1.0, 2.0, 0.0]);
        assert_eq!(model.nodes[1].no, "#3");
        assert_eq!(model.nodes[1].coordinates, [0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_parse_model_crlf() {
        let contents = "/* MATERIALS */\r\n#10=MATERIAL('S235','Structural Steel');\r\n";
        let model = parse_model(contents).unwrap();
        assert_eq!(model.materials.len(), 1);
    }
}
