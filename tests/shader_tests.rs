//! The render shader must parse and validate, and its vertex inputs must line
//! up with the Rust-side buffer layouts.

use shardmorph::gpu::{MeshVertex, Uniforms, SHADER_SOURCE};
use shardmorph::{ColorRaw, InstanceRaw};

fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(code)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

#[test]
fn test_shader_validates() {
    if let Err(e) = validate_wgsl(SHADER_SOURCE) {
        panic!("{}", e);
    }
}

#[test]
fn test_shader_entry_points() {
    let module = validate_wgsl(SHADER_SOURCE).unwrap();
    let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_uniform_struct_matches_rust_layout() {
    let module = validate_wgsl(SHADER_SOURCE).unwrap();
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
        .expect("Uniforms struct in shader");

    match &ty.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(*span as usize, std::mem::size_of::<Uniforms>());
        }
        other => panic!("Uniforms is not a struct: {:?}", other),
    }
}

#[test]
fn test_vertex_buffer_strides() {
    // mesh: position + normal
    assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    // instance: 4 model matrix columns
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
    // color: rgb
    assert_eq!(std::mem::size_of::<ColorRaw>(), 12);
}
