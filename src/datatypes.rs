#[derive(Debug)]
pub struct Material {
    pub no: String,
    pub name: String,
}

#[derive(Debug)]
pub struct Node {
    pub no: String,
    pub coordinates: [f64; 3],
}

#[derive(Debug)]
pub struct Model {
    pub materials: Vec<Material>,
    pub nodes: Vec<Node>,
}
