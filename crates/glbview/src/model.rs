//! The decoded scene graph.
//!
//! Arrays are sized exactly from the metadata and live in the allocator the
//! model was parsed with; text fields borrow from the input buffer. Cross
//! references are plain indices and are checked by
//! [`Model::check_references`] before a model is handed out.

use crate::{
    ByteView, Error, Result,
    allocator::{Arena, GLOBAL, List},
};

/// Everything decoded from one container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Model<'a> {
    /// The `asset` block.
    pub asset: Asset<'a>,
    /// Index of the default scene.
    pub scene: Option<u32>,
    /// The `scenes` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub scenes: List<'a, Scene<'a>>,
    /// The `nodes` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub nodes: List<'a, Node<'a>>,
    /// The `meshes` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub meshes: List<'a, Mesh<'a>>,
    /// The `accessors` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub accessors: List<'a, Accessor<'a>>,
    /// The `bufferViews` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub buffer_views: List<'a, BufferView>,
    /// The `buffers` array.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub buffers: List<'a, Buffer<'a>>,
    /// Length of the `materials` array. Materials themselves are not decoded.
    pub material_count: usize,
    /// Top-level arrays the metadata did not contain. References into an
    /// omitted array are not range checked.
    pub omitted: Sections,
    /// The binary chunk, when the container has one.
    pub blob: Option<ByteView<'a>>,
}

impl<'a> Model<'a> {
    /// An empty model whose arrays will live in `arena`.
    #[must_use]
    pub fn new_in(arena: Arena<'a>) -> Self {
        Self {
            asset: Asset::default(),
            scene: None,
            scenes: List::new_in(arena),
            nodes: List::new_in(arena),
            meshes: List::new_in(arena),
            accessors: List::new_in(arena),
            buffer_views: List::new_in(arena),
            buffers: List::new_in(arena),
            material_count: 0,
            omitted: Sections::NONE,
            blob: None,
        }
    }
}

impl Default for Model<'_> {
    fn default() -> Self {
        Self::new_in(GLOBAL)
    }
}

/// One flag per top-level array that other elements refer into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct Sections {
    pub scenes: bool,
    pub nodes: bool,
    pub meshes: bool,
    pub accessors: bool,
    pub buffer_views: bool,
    pub buffers: bool,
    pub materials: bool,
}

impl Sections {
    /// No flag set.
    pub const NONE: Self = Self {
        scenes: false,
        nodes: false,
        meshes: false,
        accessors: false,
        buffer_views: false,
        buffers: false,
        materials: false,
    };

    /// Every flag set.
    pub const ALL: Self = Self {
        scenes: true,
        nodes: true,
        meshes: true,
        accessors: true,
        buffer_views: true,
        buffers: true,
        materials: true,
    };
}

/// Producer metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Asset<'a> {
    pub generator: ByteView<'a>,
    pub version: ByteView<'a>,
    pub copyright: ByteView<'a>,
    pub min_version: ByteView<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scene<'a> {
    pub name: ByteView<'a>,
    /// Root nodes, in document order.
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub nodes: List<'a, u32>,
}

impl<'a> Scene<'a> {
    /// An unnamed scene without nodes.
    #[must_use]
    pub fn new_in(arena: Arena<'a>) -> Self {
        Self {
            name: ByteView::default(),
            nodes: List::new_in(arena),
        }
    }
}

impl Default for Scene<'_> {
    fn default() -> Self {
        Self::new_in(GLOBAL)
    }
}

/// A node of the scene hierarchy. Transforms default to identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node<'a> {
    pub name: ByteView<'a>,
    pub translation: [f32; 3],
    /// Unit quaternion, `x y z w`.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Column-major: `matrix[column][row]`.
    pub matrix: [[f32; 4]; 4],
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub children: List<'a, u32>,
    pub mesh: Option<u32>,
}

impl<'a> Node<'a> {
    /// An unnamed leaf node with identity transforms.
    #[must_use]
    pub fn new_in(arena: Arena<'a>) -> Self {
        Self {
            name: ByteView::default(),
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            children: List::new_in(arena),
            mesh: None,
        }
    }
}

impl Default for Node<'_> {
    fn default() -> Self {
        Self::new_in(GLOBAL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mesh<'a> {
    pub name: ByteView<'a>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "seq"))]
    pub primitives: List<'a, Primitive>,
}

impl<'a> Mesh<'a> {
    /// An unnamed mesh without primitives.
    #[must_use]
    pub fn new_in(arena: Arena<'a>) -> Self {
        Self {
            name: ByteView::default(),
            primitives: List::new_in(arena),
        }
    }
}

impl Default for Mesh<'_> {
    fn default() -> Self {
        Self::new_in(GLOBAL)
    }
}

/// Triangle list, the topology a primitive has when `mode` is absent.
pub const MODE_TRIANGLES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Primitive {
    pub attributes: Attributes,
    /// Accessor holding the index buffer.
    pub indices: Option<u32>,
    pub material: Option<u32>,
    /// Topology; see [`MODE_TRIANGLES`].
    pub mode: u32,
}

impl Default for Primitive {
    fn default() -> Self {
        Self {
            attributes: Attributes::default(),
            indices: None,
            material: None,
            mode: MODE_TRIANGLES,
        }
    }
}

/// Accessor indices of the vertex attributes a primitive may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attributes {
    pub position: Option<u32>,
    pub normal: Option<u32>,
    pub texcoord_0: Option<u32>,
    pub joints_0: Option<u32>,
    pub weights_0: Option<u32>,
}

impl Attributes {
    /// `(name, accessor)` for every attribute that is present.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> {
        [
            ("POSITION", self.position),
            ("NORMAL", self.normal),
            ("TEXCOORD_0", self.texcoord_0),
            ("JOINTS_0", self.joints_0),
            ("WEIGHTS_0", self.weights_0),
        ]
        .into_iter()
        .filter_map(|(name, accessor)| Some((name, accessor?)))
    }
}

/// A typed window onto a buffer view.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Accessor<'a> {
    /// Absent for accessors that are all zeros.
    pub buffer_view: Option<u32>,
    pub byte_offset: u32,
    /// Raw `componentType` code; see [`ComponentType`].
    pub component_type: u32,
    /// Number of elements.
    pub count: u32,
    /// `None` when absent or not one of the known type names.
    pub kind: Option<AccessorType>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "optional_seq"))]
    pub min: Option<List<'a, f32>>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "optional_seq"))]
    pub max: Option<List<'a, f32>>,
}

impl Accessor<'_> {
    /// The decoded component type, if the code is a known one.
    #[must_use]
    pub fn component(&self) -> Option<ComponentType> {
        ComponentType::from_code(self.component_type)
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    /// Matches the type names used in the metadata (`"SCALAR"`, `"VEC3"`, ...).
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"SCALAR" => Self::Scalar,
            b"VEC2" => Self::Vec2,
            b"VEC3" => Self::Vec3,
            b"VEC4" => Self::Vec4,
            b"MAT2" => Self::Mat2,
            b"MAT3" => Self::Mat3,
            b"MAT4" => Self::Mat4,
            _ => return None,
        })
    }

    /// Components per element.
    #[must_use]
    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// Storage type of accessor components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    /// Maps a `componentType` code.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            5120 => Self::I8,
            5121 => Self::U8,
            5122 => Self::I16,
            5123 => Self::U16,
            5125 => Self::U32,
            5126 => Self::F32,
            _ => return None,
        })
    }

    /// Size of one component in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BufferView {
    pub buffer: u32,
    pub byte_length: u32,
    pub byte_offset: u32,
    pub byte_stride: Option<u32>,
    /// Intended GPU binding (`34962` vertex data, `34963` index data).
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Buffer<'a> {
    /// Empty for the buffer stored in the container's binary chunk.
    pub uri: ByteView<'a>,
    pub byte_length: u32,
}

impl Model<'_> {
    /// Checks that every stored index addresses an existing element of its
    /// array, skipping arrays flagged in [`Model::omitted`].
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for the first dangling reference.
    pub fn check_references(&self) -> Result<()> {
        let scenes = Target::new(self.omitted.scenes, self.scenes.len());
        let nodes = Target::new(self.omitted.nodes, self.nodes.len());
        let meshes = Target::new(self.omitted.meshes, self.meshes.len());
        let accessors = Target::new(self.omitted.accessors, self.accessors.len());
        let views = Target::new(self.omitted.buffer_views, self.buffer_views.len());
        let buffers = Target::new(self.omitted.buffers, self.buffers.len());
        let materials = Target::new(self.omitted.materials, self.material_count);

        if let Some(scene) = self.scene {
            scenes.check("scene", scene)?;
        }
        for scene in &self.scenes {
            for &node in &scene.nodes {
                nodes.check("scene node", node)?;
            }
        }
        for node in &self.nodes {
            for &child in &node.children {
                nodes.check("node child", child)?;
            }
            if let Some(mesh) = node.mesh {
                meshes.check("node mesh", mesh)?;
            }
        }
        for primitive in self.meshes.iter().flat_map(|mesh| mesh.primitives.iter()) {
            for (_, accessor) in primitive.attributes.iter() {
                accessors.check("attribute accessor", accessor)?;
            }
            if let Some(indices) = primitive.indices {
                accessors.check("indices accessor", indices)?;
            }
            if let Some(material) = primitive.material {
                materials.check("material", material)?;
            }
        }
        for accessor in &self.accessors {
            if let Some(view) = accessor.buffer_view {
                views.check("buffer view", view)?;
            }
        }
        for view in &self.buffer_views {
            buffers.check("buffer", view.buffer)?;
        }
        Ok(())
    }
}

/// Length of a referenced array; `None` when the array was omitted.
#[derive(Clone, Copy)]
struct Target(Option<usize>);

impl Target {
    fn new(omitted: bool, len: usize) -> Self {
        Self((!omitted).then_some(len))
    }

    fn check(self, field: &'static str, index: u32) -> Result<()> {
        let index = index as usize;
        match self.0 {
            Some(len) if index >= len => Err(Error::IndexOutOfRange { field, index, len }),
            _ => Ok(()),
        }
    }
}

#[cfg(feature = "serde")]
fn seq<T: serde::Serialize, S: serde::Serializer>(
    items: &List<'_, T>,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter())
}

#[cfg(feature = "serde")]
fn optional_seq<S: serde::Serializer>(
    items: &Option<List<'_, f32>>,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    match items {
        Some(items) => serializer.serialize_some(items.as_slice()),
        None => serializer.serialize_none(),
    }
}
