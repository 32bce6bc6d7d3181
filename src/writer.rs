use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::{
    datatypes::{Material, Model, Node},
    error::ConverterError,
};

/// Writes one `<tag>value</tag>` element
fn text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_material_item<W: Write>(
    writer: &mut Writer<W>,
    material: &Material,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "no", &material.no)?;
    text_element(writer, "material_type", "TYPE_STEEL")?;
    text_element(writer, "material_model", "MODEL_ISOTROPIC_LINEAR_ELASTIC")?;
    text_element(writer, "application_context", "STEEL_DESIGN")?;
    text_element(writer, "user_defined_name_enabled", "false")?;
    text_element(
        writer,
        "name",
        &format!("{} | EN 1993-1-1:2005-05", material.name),
    )?;
    text_element(writer, "user_defined", "false")?;
    text_element(writer, "definition_type", "DERIVED_G")?;
    text_element(writer, "is_temperature_dependent", "false")?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_coordinate_group<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    coordinates: &[f64; 3],
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    text_element(writer, "x", &coordinates[0].to_string())?;
    text_element(writer, "y", &coordinates[1].to_string())?;
    text_element(writer, "z", &coordinates[2].to_string())?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_node_item<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "no", &node.no)?;
    text_element(writer, "type", "TYPE_STANDARD")?;
    text_element(writer, "coordinate_system", "1")?;
    text_element(
        writer,
        "coordinate_system_type",
        "COORDINATE_SYSTEM_CARTESIAN",
    )?;

    // The target schema expects both the grouped and the flattened
    // representation of each coordinate triple
    write_coordinate_group(writer, "coordinates", &node.coordinates)?;
    text_element(writer, "coordinate_1", &node.coordinates[0].to_string())?;
    text_element(writer, "coordinate_2", &node.coordinates[1].to_string())?;
    text_element(writer, "coordinate_3", &node.coordinates[2].to_string())?;

    // No global transform is applied; the global coordinates repeat the
    // local ones
    write_coordinate_group(writer, "global_coordinates", &node.coordinates)?;
    text_element(
        writer,
        "global_coordinate_1",
        &node.coordinates[0].to_string(),
    )?;
    text_element(
        writer,
        "global_coordinate_2",
        &node.coordinates[1].to_string(),
    )?;
    text_element(
        writer,
        "global_coordinate_3",
        &node.coordinates[2].to_string(),
    )?;

    text_element(writer, "is_generated", "false")?;
    text_element(writer, "support", "placeholder")?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_model<W: Write>(writer: &mut Writer<W>, model: &Model) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("model")))?;
    writer.write_event(Event::Start(BytesStart::new("basic_objects")))?;

    writer.write_event(Event::Start(BytesStart::new("material")))?;
    for material in &model.materials {
        write_material_item(writer, material)?;
    }
    writer.write_event(Event::End(BytesEnd::new("material")))?;

    writer.write_event(Event::End(BytesEnd::new("basic_objects")))?;

    // `node` is a sibling of `basic_objects` in the target schema
    writer.write_event(Event::Start(BytesStart::new("node")))?;
    for node in &model.nodes {
        write_node_item(writer, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new("node")))?;

    writer.write_event(Event::End(BytesEnd::new("model")))?;
    Ok(())
}

/// Serializes a Model into an indented XML document
///
/// # Arguments
/// * `model` - A reference to the parsed model
///
/// # Returns
/// The document bytes
pub fn build_document(model: &Model) -> Result<Vec<u8>, ConverterError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if let Err(err) = write_model(&mut writer, model) {
        return Err(ConverterError::Output(format!(
            "Failed to serialize model: {}",
            err
        )));
    }

    Ok(writer.into_inner())
}

/// Writes the model XML to the output file
///
/// The document is assembled in memory first, so nothing is committed to
/// the output path unless serialization succeeded in full.
///
/// # Arguments
/// * `model` - A reference to the parsed model
/// * `output_file` - The filename of the output xml
pub fn xml_output(model: &Model, output_file: &str) -> Result<(), ConverterError> {
    let document = build_document(model)?;

    if let Err(err) = std::fs::write(output_file, &document) {
        return Err(ConverterError::Output(format!(
            "Failed to write {}: {}",
            output_file, err
        )));
    }

    println!("info: wrote output to {}", output_file);

    Ok(())
}
