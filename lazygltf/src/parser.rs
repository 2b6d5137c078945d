use crate::extensions::{self, check_required};
use crate::json::{self, JsonData};
use crate::location::{BinaryChunk, BufferAllocator, Locator};
use crate::{Asset, BufferFreeCallback, BufferInfo, Error, Extensions, UserPointer, validate};
use serde_json::{Map, Value};
use std::any::Any;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::rc::Rc;

bitflags::bitflags! {
    /// Behavioural switches for a single document load.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Options: u32 {
        /// Accept documents whose `asset` field is missing or malformed.
        const DONT_REQUIRE_VALID_ASSET_MEMBER = 1 << 0;
        /// Accept accessors with component type 5130 (double).
        const ALLOW_DOUBLE = 1 << 1;
        /// Store matrix-form node transforms as decomposed TRS.
        const DECOMPOSE_NODE_MATRICES = 1 << 2;
        /// Read external buffer files while locating them.
        const LOAD_EXTERNAL_BUFFERS = 1 << 3;
        /// Copy the GLB binary chunk into memory instead of referencing the file.
        const LOAD_GLB_BUFFERS = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Top-level document sections that can be parsed independently.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Category: u32 {
        const BUFFERS = 1 << 0;
        const BUFFER_VIEWS = 1 << 1;
        const ACCESSORS = 1 << 2;
        const IMAGES = 1 << 3;
        const SAMPLERS = 1 << 4;
        const TEXTURES = 1 << 5;
        const MATERIALS = 1 << 6;
        const MESHES = 1 << 7;
        const SKINS = 1 << 8;
        const CAMERAS = 1 << 9;
        const LIGHTS = 1 << 10;
        const NODES = 1 << 11;
        const SCENES = 1 << 12;
        const ANIMATIONS = 1 << 13;
    }
}

#[derive(Copy, Clone, Debug)]
enum Step {
    Buffers,
    BufferViews,
    Accessors,
    Images,
    Samplers,
    Textures,
    Materials,
    Meshes,
    Skins,
    Cameras,
    Lights,
    Nodes,
    Scenes,
    Animations,
}

/// Every category in the order it is extracted, with its direct dependencies.
const PARSE_ORDER: [(Step, Category, Category); 14] = [
    (Step::Buffers, Category::BUFFERS, Category::empty()),
    (Step::BufferViews, Category::BUFFER_VIEWS, Category::BUFFERS),
    (Step::Accessors, Category::ACCESSORS, Category::BUFFER_VIEWS),
    (Step::Images, Category::IMAGES, Category::BUFFER_VIEWS),
    (Step::Samplers, Category::SAMPLERS, Category::empty()),
    (
        Step::Textures,
        Category::TEXTURES,
        Category::IMAGES.union(Category::SAMPLERS),
    ),
    (Step::Materials, Category::MATERIALS, Category::TEXTURES),
    (
        Step::Meshes,
        Category::MESHES,
        Category::ACCESSORS.union(Category::MATERIALS),
    ),
    (Step::Skins, Category::SKINS, Category::ACCESSORS),
    (Step::Cameras, Category::CAMERAS, Category::empty()),
    (Step::Lights, Category::LIGHTS, Category::empty()),
    (
        Step::Nodes,
        Category::NODES,
        Category::MESHES
            .union(Category::SKINS)
            .union(Category::CAMERAS)
            .union(Category::LIGHTS),
    ),
    (Step::Scenes, Category::SCENES, Category::NODES),
    (Step::Animations, Category::ANIMATIONS, Category::ACCESSORS),
];

impl Category {
    pub const ALL: Self = Self::all();

    /// `self` plus everything it transitively depends on.
    pub fn with_dependencies(self) -> Self {
        let mut closure = self;
        loop {
            let mut next = closure;
            for (_, category, dependencies) in PARSE_ORDER {
                if closure.contains(category) {
                    next |= dependencies;
                }
            }
            if next == closure {
                return closure;
            }
            closure = next;
        }
    }
}

/// Holds configuration only; every loaded document gets its own [`Gltf`].
#[derive(Default)]
pub struct Parser {
    extensions: Extensions,
    allocator: Option<BufferAllocator>,
    user_pointer: Option<UserPointer>,
    error: Option<Error>,
}

impl Parser {
    pub fn new(extensions: Extensions) -> Self {
        Self {
            extensions,
            ..Self::default()
        }
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Routes buffer storage through caller-owned memory.
    ///
    /// `map` runs once per buffer with its byte size and the user pointer. `free` runs for
    /// each allocation when the owning [`Gltf`] is dropped.
    pub fn set_buffer_allocation_callback<F>(
        &mut self,
        map: F,
        free: Option<Box<BufferFreeCallback>>,
    ) where
        F: Fn(u64, Option<&dyn Any>) -> BufferInfo + 'static,
    {
        self.allocator = Some(BufferAllocator {
            map: Rc::new(map),
            free: free.map(Rc::from),
        });
    }

    pub fn set_user_pointer(&mut self, pointer: UserPointer) {
        self.user_pointer = Some(pointer);
    }

    /// Error of the most recent load, `None` when it succeeded.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn load_gltf<'a>(
        &mut self,
        json: &'a JsonData,
        directory: impl AsRef<Path>,
        options: Options,
    ) -> Result<Gltf<'a>, Error> {
        let result = self.create(Cow::Borrowed(json), directory.as_ref(), options, None);
        self.record(result)
    }

    /// Loads a binary `.glb` container from disk.
    #[cfg(feature = "binary")]
    pub fn load_binary_gltf(
        &mut self,
        path: impl AsRef<Path>,
        options: Options,
    ) -> Result<Gltf<'static>, Error> {
        let path = path.as_ref();
        let result = crate::glb::read_glb(path).and_then(|glb| {
            let directory = path.parent().unwrap_or(Path::new(""));
            self.create(Cow::Owned(glb.json), directory, options, glb.binary)
        });
        self.record(result)
    }

    fn create<'a>(
        &self,
        json: Cow<'a, JsonData>,
        directory: &Path,
        options: Options,
        binary_chunk: Option<BinaryChunk>,
    ) -> Result<Gltf<'a>, Error> {
        json.root_object()?;
        Ok(Gltf {
            json,
            directory: directory.to_path_buf(),
            options,
            extensions: self.extensions,
            allocator: self.allocator.clone(),
            user_pointer: self.user_pointer.clone(),
            binary_chunk,
            allocations: Vec::new(),
            ignored_extensions: None,
            parsed: Category::empty(),
            asset: Asset::default(),
        })
    }

    fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        self.error = result.as_ref().err().cloned();
        result
    }
}

/// One document being parsed, category by category.
pub struct Gltf<'a> {
    json: Cow<'a, JsonData>,
    directory: PathBuf,
    options: Options,
    extensions: Extensions,
    allocator: Option<BufferAllocator>,
    user_pointer: Option<UserPointer>,
    binary_chunk: Option<BinaryChunk>,
    allocations: Vec<BufferInfo>,
    ignored_extensions: Option<Vec<String>>,
    parsed: Category,
    asset: Asset,
}

impl Gltf<'_> {
    /// Populates `categories` and everything they depend on.
    ///
    /// Categories filled by earlier calls are left alone, also when this call fails.
    pub fn parse(&mut self, categories: Category) -> Result<(), Error> {
        let root = self.json.root_object()?;

        let asset_info = json::asset_info(root);
        if asset_info.is_none()
            && !self
                .options
                .contains(Options::DONT_REQUIRE_VALID_ASSET_MEMBER)
        {
            return Err(Error::InvalidOrMissingAssetField);
        }

        let required = json::string_list(root, "extensionsRequired")?;
        check_required(&required, self.extensions)?;
        let used = json::string_list(root, "extensionsUsed")?;
        if self.ignored_extensions.is_none() {
            let ignored = extensions::ignored_extensions(&used, self.extensions);
            for name in &ignored {
                log::warn!("extension {name} is used but not enabled; its data is skipped");
            }
            self.ignored_extensions = Some(ignored.into_iter().map(str::to_string).collect());
        }

        self.asset.asset_info = asset_info;
        self.asset.extensions_required = required;
        self.asset.extensions_used = used;

        let pending = categories.with_dependencies() - self.parsed;
        for (step, category, _) in PARSE_ORDER {
            if !pending.contains(category) {
                continue;
            }
            let locator = Locator {
                directory: &self.directory,
                options: self.options,
                binary_chunk: self.binary_chunk.as_ref(),
                allocator: self.allocator.as_ref(),
                user_pointer: self.user_pointer.as_ref(),
            };
            parse_category(
                step,
                root,
                &locator,
                self.extensions,
                self.options,
                &mut self.asset,
                &mut self.allocations,
            )?;
            self.parsed |= category;
        }
        Ok(())
    }

    /// Checks every cross-reference of everything parsed so far.
    pub fn validate(&self) -> Result<(), Error> {
        if self.parsed.is_empty() {
            return Err(Error::NothingParsed);
        }
        validate::validate(&self.asset, self.parsed)
    }

    pub fn get_parsed_asset(&self) -> &Asset {
        &self.asset
    }

    pub fn parsed_categories(&self) -> Category {
        self.parsed
    }

    /// Names from `extensionsUsed` whose data is skipped because they are unknown or not
    /// enabled. Empty until the first `parse` gets past the required-extension check.
    pub fn ignored_extensions(&self) -> &[String] {
        self.ignored_extensions.as_deref().unwrap_or_default()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Drop for Gltf<'_> {
    fn drop(&mut self) {
        release(
            self.allocator.as_ref(),
            self.user_pointer.as_ref(),
            self.allocations.drain(..),
        );
    }
}

/// Hands custom buffers back to the free callback, if one is registered.
fn release(
    allocator: Option<&BufferAllocator>,
    user_pointer: Option<&UserPointer>,
    allocations: impl IntoIterator<Item = BufferInfo>,
) {
    let Some(free) = allocator.and_then(|a| a.free.as_ref()) else {
        return;
    };
    let user_pointer = user_pointer.map(|p| &**p);
    for info in allocations {
        free(&info, user_pointer);
    }
}

fn parse_category(
    step: Step,
    root: &Map<String, Value>,
    locator: &Locator<'_>,
    enabled: Extensions,
    options: Options,
    asset: &mut Asset,
    allocations: &mut Vec<BufferInfo>,
) -> Result<(), Error> {
    log::debug!("parsing {step:?}");
    match step {
        Step::Buffers => {
            // Allocations are kept only when every buffer resolves.
            let mut pending = Vec::new();
            match json::buffers(root, locator, &mut pending) {
                Ok(buffers) => {
                    asset.buffers = buffers;
                    allocations.append(&mut pending);
                }
                Err(error) => {
                    release(locator.allocator, locator.user_pointer, pending);
                    return Err(error);
                }
            }
        }
        Step::BufferViews => asset.buffer_views = json::buffer_views(root)?,
        Step::Accessors => asset.accessors = json::accessors(root, options)?,
        Step::Images => {
            asset.images = json::images(root, locator, asset.buffer_views.len())?;
        }
        Step::Samplers => asset.samplers = json::samplers(root)?,
        Step::Textures => asset.textures = json::textures(root, enabled)?,
        Step::Materials => asset.materials = json::materials(root, enabled)?,
        Step::Meshes => asset.meshes = json::meshes(root)?,
        Step::Skins => asset.skins = json::skins(root)?,
        Step::Cameras => asset.cameras = json::cameras(root)?,
        Step::Lights => {
            asset.lights = extensions::lights(json::root_extensions(root)?, enabled)?;
        }
        Step::Nodes => asset.nodes = json::nodes(root, enabled, options)?,
        Step::Scenes => {
            let default_scene = json::default_scene(root)?;
            asset.scenes = json::scenes(root)?;
            asset.default_scene = default_scene;
        }
        Step::Animations => asset.animations = json::animations(root)?,
    }
    Ok(())
}
