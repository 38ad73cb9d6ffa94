//! The routing table: which model field a key or array element lands in.
//!
//! Keys are matched byte-for-byte against a fixed set per section. Anything
//! not listed routes to `Skip`; its subtree is still walked structurally but
//! nothing is stored.

use super::numbers;
use crate::{
    ByteView, Error, Result,
    allocator::{Arena, allocate_array},
    model::{Accessor, AccessorType, BufferView, Mesh, Model, Node, Primitive, Scene},
};

/// The top-level key whose subtree is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    None,
    Asset,
    Scene,
    Scenes,
    Nodes,
    Meshes,
    Accessors,
    BufferViews,
    Buffers,
    Materials,
    Ignored,
}

impl Section {
    pub(crate) fn from_key(key: &[u8]) -> Self {
        match key {
            b"asset" => Self::Asset,
            b"scene" => Self::Scene,
            b"scenes" => Self::Scenes,
            b"nodes" => Self::Nodes,
            b"meshes" => Self::Meshes,
            b"accessors" => Self::Accessors,
            b"bufferViews" => Self::BufferViews,
            b"buffers" => Self::Buffers,
            b"materials" => Self::Materials,
            _ => Self::Ignored,
        }
    }

    /// Destination of the section's own value.
    pub(crate) fn member(self) -> Member {
        match self {
            Self::Asset => Member::Object(ObjectSlot::Asset),
            Self::Scene => Member::Integer(IntField::DefaultScene),
            Self::Scenes
            | Self::Nodes
            | Self::Meshes
            | Self::Accessors
            | Self::BufferViews
            | Self::Buffers
            | Self::Materials => Member::Array(ArraySlot::Elements),
            Self::None | Self::Ignored => Member::Skip,
        }
    }

    /// Sections whose array elements are decoded object by object.
    fn has_elements(self) -> bool {
        matches!(
            self,
            Self::Scenes
                | Self::Nodes
                | Self::Meshes
                | Self::Accessors
                | Self::BufferViews
                | Self::Buffers
        )
    }
}

/// What a key's value is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Member {
    Skip,
    Object(ObjectSlot),
    Array(ArraySlot),
    Text(TextField),
    Integer(IntField),
}

/// Where the members of an object are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectSlot {
    Skip,
    Document,
    Asset,
    /// Element `i` of the current section's array.
    Element(usize),
    Primitive { mesh: usize, primitive: usize },
    Attributes { mesh: usize, primitive: usize },
}

impl ObjectSlot {
    pub(crate) fn member(self, section: Section, key: &[u8]) -> Member {
        match self {
            Self::Skip => Member::Skip,
            Self::Document => Section::from_key(key).member(),
            Self::Asset => asset_member(key),
            Self::Element(i) => match section {
                Section::Scenes => scene_member(i, key),
                Section::Nodes => node_member(i, key),
                Section::Meshes => mesh_member(i, key),
                Section::Accessors => accessor_member(i, key),
                Section::BufferViews => buffer_view_member(i, key),
                Section::Buffers => buffer_member(i, key),
                Section::None
                | Section::Asset
                | Section::Scene
                | Section::Materials
                | Section::Ignored => Member::Skip,
            },
            Self::Primitive { mesh, primitive } => match key {
                b"attributes" => Member::Object(Self::Attributes { mesh, primitive }),
                b"indices" => Member::Integer(IntField::Indices(mesh, primitive)),
                b"material" => Member::Integer(IntField::Material(mesh, primitive)),
                b"mode" => Member::Integer(IntField::Mode(mesh, primitive)),
                _ => Member::Skip,
            },
            Self::Attributes { mesh, primitive } => AttributeName::from_key(key)
                .map_or(Member::Skip, |name| {
                    Member::Integer(IntField::Attribute(mesh, primitive, name))
                }),
        }
    }
}

fn asset_member(key: &[u8]) -> Member {
    match key {
        b"generator" => Member::Text(TextField::Generator),
        b"version" => Member::Text(TextField::Version),
        b"copyright" => Member::Text(TextField::Copyright),
        b"minVersion" => Member::Text(TextField::MinVersion),
        _ => Member::Skip,
    }
}

fn scene_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"name" => Member::Text(TextField::SceneName(i)),
        b"nodes" => Member::Array(ArraySlot::Indices(IndexList::SceneNodes(i))),
        _ => Member::Skip,
    }
}

fn node_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"name" => Member::Text(TextField::NodeName(i)),
        b"children" => Member::Array(ArraySlot::Indices(IndexList::NodeChildren(i))),
        b"mesh" => Member::Integer(IntField::NodeMesh(i)),
        b"translation" => Member::Array(ArraySlot::Reals(RealList::Translation(i))),
        b"rotation" => Member::Array(ArraySlot::Reals(RealList::Rotation(i))),
        b"scale" => Member::Array(ArraySlot::Reals(RealList::Scale(i))),
        b"matrix" => Member::Array(ArraySlot::Reals(RealList::Matrix(i))),
        _ => Member::Skip,
    }
}

fn mesh_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"name" => Member::Text(TextField::MeshName(i)),
        b"primitives" => Member::Array(ArraySlot::Primitives(i)),
        _ => Member::Skip,
    }
}

fn accessor_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"bufferView" => Member::Integer(IntField::AccessorBufferView(i)),
        b"byteOffset" => Member::Integer(IntField::AccessorByteOffset(i)),
        b"componentType" => Member::Integer(IntField::AccessorComponentType(i)),
        b"count" => Member::Integer(IntField::AccessorCount(i)),
        b"type" => Member::Text(TextField::AccessorType(i)),
        b"min" => Member::Array(ArraySlot::Reals(RealList::Min(i))),
        b"max" => Member::Array(ArraySlot::Reals(RealList::Max(i))),
        _ => Member::Skip,
    }
}

fn buffer_view_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"buffer" => Member::Integer(IntField::ViewBuffer(i)),
        b"byteLength" => Member::Integer(IntField::ViewByteLength(i)),
        b"byteOffset" => Member::Integer(IntField::ViewByteOffset(i)),
        b"byteStride" => Member::Integer(IntField::ViewByteStride(i)),
        b"target" => Member::Integer(IntField::ViewTarget(i)),
        _ => Member::Skip,
    }
}

fn buffer_member(i: usize, key: &[u8]) -> Member {
    match key {
        b"uri" => Member::Text(TextField::BufferUri(i)),
        b"byteLength" => Member::Integer(IntField::BufferByteLength(i)),
        _ => Member::Skip,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeName {
    Position,
    Normal,
    Texcoord0,
    Joints0,
    Weights0,
}

impl AttributeName {
    fn from_key(key: &[u8]) -> Option<Self> {
        Some(match key {
            b"POSITION" => Self::Position,
            b"NORMAL" => Self::Normal,
            b"TEXCOORD_0" => Self::Texcoord0,
            b"JOINTS_0" => Self::Joints0,
            b"WEIGHTS_0" => Self::Weights0,
            _ => return None,
        })
    }
}

/// Quoted scalar destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextField {
    Generator,
    Version,
    Copyright,
    MinVersion,
    SceneName(usize),
    NodeName(usize),
    MeshName(usize),
    AccessorType(usize),
    BufferUri(usize),
}

impl TextField {
    pub(crate) fn write<'a>(self, model: &mut Model<'a>, text: ByteView<'a>) -> Result<()> {
        match self {
            Self::Generator => model.asset.generator = text,
            Self::Version => model.asset.version = text,
            Self::Copyright => model.asset.copyright = text,
            Self::MinVersion => model.asset.min_version = text,
            Self::SceneName(i) => element(&mut model.scenes, i, "scene")?.name = text,
            Self::NodeName(i) => node(model, i)?.name = text,
            Self::MeshName(i) => element(&mut model.meshes, i, "mesh")?.name = text,
            Self::AccessorType(i) => accessor(model, i)?.kind = AccessorType::from_name(&text),
            Self::BufferUri(i) => element(&mut model.buffers, i, "buffer")?.uri = text,
        }
        Ok(())
    }
}

/// Unsigned integer destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntField {
    DefaultScene,
    NodeMesh(usize),
    AccessorBufferView(usize),
    AccessorByteOffset(usize),
    AccessorComponentType(usize),
    AccessorCount(usize),
    ViewBuffer(usize),
    ViewByteLength(usize),
    ViewByteOffset(usize),
    ViewByteStride(usize),
    ViewTarget(usize),
    BufferByteLength(usize),
    Indices(usize, usize),
    Material(usize, usize),
    Mode(usize, usize),
    Attribute(usize, usize, AttributeName),
}

impl IntField {
    pub(crate) fn write(self, model: &mut Model<'_>, value: u32) -> Result<()> {
        match self {
            Self::DefaultScene => model.scene = Some(value),
            Self::NodeMesh(i) => node(model, i)?.mesh = Some(value),
            Self::AccessorBufferView(i) => accessor(model, i)?.buffer_view = Some(value),
            Self::AccessorByteOffset(i) => accessor(model, i)?.byte_offset = value,
            Self::AccessorComponentType(i) => accessor(model, i)?.component_type = value,
            Self::AccessorCount(i) => accessor(model, i)?.count = value,
            Self::ViewBuffer(i) => buffer_view(model, i)?.buffer = value,
            Self::ViewByteLength(i) => buffer_view(model, i)?.byte_length = value,
            Self::ViewByteOffset(i) => buffer_view(model, i)?.byte_offset = value,
            Self::ViewByteStride(i) => buffer_view(model, i)?.byte_stride = Some(value),
            Self::ViewTarget(i) => buffer_view(model, i)?.target = Some(value),
            Self::BufferByteLength(i) => element(&mut model.buffers, i, "buffer")?.byte_length = value,
            Self::Indices(m, p) => primitive(model, m, p)?.indices = Some(value),
            Self::Material(m, p) => primitive(model, m, p)?.material = Some(value),
            Self::Mode(m, p) => primitive(model, m, p)?.mode = value,
            Self::Attribute(m, p, name) => {
                let attributes = &mut primitive(model, m, p)?.attributes;
                let slot = match name {
                    AttributeName::Position => &mut attributes.position,
                    AttributeName::Normal => &mut attributes.normal,
                    AttributeName::Texcoord0 => &mut attributes.texcoord_0,
                    AttributeName::Joints0 => &mut attributes.joints_0,
                    AttributeName::Weights0 => &mut attributes.weights_0,
                };
                *slot = Some(value);
            }
        }
        Ok(())
    }
}

/// Where the elements of an array are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArraySlot {
    Skip,
    /// The array value of a top-level section.
    Elements,
    Indices(IndexList),
    Reals(RealList),
    Primitives(usize),
}

/// Arrays of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexList {
    SceneNodes(usize),
    NodeChildren(usize),
}

/// Arrays of numbers decoded as `f32`. Node transforms have a fixed size;
/// accessor bounds are allocated at the length found in the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RealList {
    Translation(usize),
    Rotation(usize),
    Scale(usize),
    Matrix(usize),
    Min(usize),
    Max(usize),
}

impl ArraySlot {
    /// Requests the destination of an array of `len` elements from `arena`.
    pub(crate) fn allocate<'a>(
        self,
        model: &mut Model<'a>,
        section: Section,
        len: usize,
        arena: Arena<'a>,
    ) -> Result<()> {
        match self {
            Self::Skip
            | Self::Reals(
                RealList::Translation(_)
                | RealList::Rotation(_)
                | RealList::Scale(_)
                | RealList::Matrix(_),
            ) => {}
            Self::Elements => {
                let omitted = &mut model.omitted;
                match section {
                    Section::Scenes => {
                        model.scenes = allocate_array(arena, len, || Scene::new_in(arena))?;
                        omitted.scenes = false;
                    }
                    Section::Nodes => {
                        model.nodes = allocate_array(arena, len, || Node::new_in(arena))?;
                        omitted.nodes = false;
                    }
                    Section::Meshes => {
                        model.meshes = allocate_array(arena, len, || Mesh::new_in(arena))?;
                        omitted.meshes = false;
                    }
                    Section::Accessors => {
                        model.accessors = allocate_array(arena, len, Accessor::default)?;
                        omitted.accessors = false;
                    }
                    Section::BufferViews => {
                        model.buffer_views = allocate_array(arena, len, BufferView::default)?;
                        omitted.buffer_views = false;
                    }
                    Section::Buffers => {
                        model.buffers = allocate_array(arena, len, Default::default)?;
                        omitted.buffers = false;
                    }
                    Section::Materials => {
                        model.material_count = len;
                        omitted.materials = false;
                    }
                    Section::None | Section::Asset | Section::Scene | Section::Ignored => {}
                }
            }
            Self::Indices(IndexList::SceneNodes(i)) => {
                element(&mut model.scenes, i, "scene")?.nodes =
                    allocate_array(arena, len, u32::default)?;
            }
            Self::Indices(IndexList::NodeChildren(i)) => {
                node(model, i)?.children = allocate_array(arena, len, u32::default)?;
            }
            Self::Reals(RealList::Min(i)) => {
                accessor(model, i)?.min = Some(allocate_array(arena, len, f32::default)?);
            }
            Self::Reals(RealList::Max(i)) => {
                accessor(model, i)?.max = Some(allocate_array(arena, len, f32::default)?);
            }
            Self::Primitives(i) => {
                element(&mut model.meshes, i, "mesh")?.primitives =
                    allocate_array(arena, len, Primitive::default)?;
            }
        }
        tracing::trace!(slot = ?self, len, "sized array");
        Ok(())
    }

    /// Arrays whose elements must all be bare numbers.
    pub(crate) fn is_numeric(self) -> bool {
        matches!(self, Self::Indices(_) | Self::Reals(_))
    }

    /// Destination of an object found at element `index`, or `None` when
    /// the array only holds numbers.
    pub(crate) fn element_object(self, section: Section, index: usize) -> Option<ObjectSlot> {
        Some(match self {
            Self::Elements if section.has_elements() => ObjectSlot::Element(index),
            Self::Primitives(mesh) => ObjectSlot::Primitive {
                mesh,
                primitive: index,
            },
            Self::Elements | Self::Skip => ObjectSlot::Skip,
            Self::Indices(_) | Self::Reals(_) => return None,
        })
    }

    /// Decodes and stores a bare literal found at element `index`. `at` is
    /// the literal's byte offset, for error reporting.
    pub(crate) fn write_literal(
        self,
        model: &mut Model<'_>,
        index: usize,
        at: usize,
        literal: &[u8],
    ) -> Result<()> {
        match self {
            Self::Indices(list) => {
                let value = numbers::decode_unsigned(literal).ok_or(Error::BadNumber { offset: at })?;
                list.write(model, index, value)
            }
            Self::Reals(list) => {
                let value = numbers::decode_real(literal).ok_or(Error::BadNumber { offset: at })?;
                list.write(model, index, value)
            }
            Self::Skip | Self::Elements | Self::Primitives(_) => Ok(()),
        }
    }
}

impl IndexList {
    fn write(self, model: &mut Model<'_>, index: usize, value: u32) -> Result<()> {
        let list = match self {
            Self::SceneNodes(i) => &mut element(&mut model.scenes, i, "scene")?.nodes,
            Self::NodeChildren(i) => &mut node(model, i)?.children,
        };
        *element(list, index, "index list")? = value;
        Ok(())
    }
}

impl RealList {
    fn write(self, model: &mut Model<'_>, index: usize, value: f32) -> Result<()> {
        let slot = match self {
            Self::Translation(i) => element(&mut node(model, i)?.translation, index, "translation")?,
            Self::Rotation(i) => element(&mut node(model, i)?.rotation, index, "rotation")?,
            Self::Scale(i) => element(&mut node(model, i)?.scale, index, "scale")?,
            Self::Matrix(i) => {
                let columns = &mut node(model, i)?.matrix;
                let column = element(columns, index / 4, "matrix")?;
                element(column, index % 4, "matrix")?
            }
            Self::Min(i) => bound(accessor(model, i)?.min.as_deref_mut(), index, "min")?,
            Self::Max(i) => bound(accessor(model, i)?.max.as_deref_mut(), index, "max")?,
        };
        *slot = value;
        Ok(())
    }
}

fn element<'m, T>(items: &'m mut [T], index: usize, field: &'static str) -> Result<&'m mut T> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(Error::IndexOutOfRange { field, index, len })
}

fn bound<'m>(
    values: Option<&'m mut [f32]>,
    index: usize,
    field: &'static str,
) -> Result<&'m mut f32> {
    match values {
        Some(values) => element(values, index, field),
        None => Err(Error::IndexOutOfRange {
            field,
            index,
            len: 0,
        }),
    }
}

fn node<'m, 'a>(model: &'m mut Model<'a>, i: usize) -> Result<&'m mut Node<'a>> {
    element(&mut model.nodes, i, "node")
}

fn accessor<'m, 'a>(model: &'m mut Model<'a>, i: usize) -> Result<&'m mut Accessor<'a>> {
    element(&mut model.accessors, i, "accessor")
}

fn buffer_view<'m>(model: &'m mut Model<'_>, i: usize) -> Result<&'m mut BufferView> {
    element(&mut model.buffer_views, i, "buffer view")
}

fn primitive<'m>(model: &'m mut Model<'_>, mesh: usize, primitive: usize) -> Result<&'m mut Primitive> {
    let primitives = &mut element(&mut model.meshes, mesh, "mesh")?.primitives;
    element(primitives, primitive, "primitive")
}
