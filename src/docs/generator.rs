use std::path::PathBuf;

use tracing::{Dispatch, debug, dispatcher, info, instrument, warn};

use super::{
    ConditionResolver, RenderedRow, assemble, flatten, render_component, write_atomically,
};
use crate::{
    DocgenError, Result,
    config::GeneratorOptions,
    convert::{ConversionRequest, ConverterRegistry},
    metadata::{ComponentDescriptor, ComponentFilter, DescriptorFileProvider, MetadataProvider},
};

const WORK_DIR_LABEL: &str = "<work_dir>";

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Path of the primary document.
    pub document: PathBuf,
    /// Documented component names, in document order.
    pub components: Vec<String>,
    /// Converted outputs as (format, path), in format-name order.
    pub conversions: Vec<(String, PathBuf)>,
}

/// Generates the component reference document.
///
/// A run is a sequential pipeline: scan, filter, flatten, resolve conditions,
/// render tables, assemble and write the document, then convert it into every
/// requested format. The first failure aborts the run.
pub struct DocsGenerator {
    options: GeneratorOptions,
    converters: ConverterRegistry,
    dispatch: Option<Dispatch>,
}

impl DocsGenerator {
    /// Creates a generator; converters come from the defaults plus the
    /// configured overrides.
    pub fn new(options: GeneratorOptions) -> Self {
        let converters = ConverterRegistry::from_settings(&options.converters);
        Self {
            options,
            converters,
            dispatch: None,
        }
    }

    /// Replaces the converter registry.
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Routes the run's log events to `dispatch` instead of the ambient
    /// subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Options of this generator.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates documentation for every component found under the
    /// configured roots.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::ConfigValidation` if no root is configured and
    /// otherwise fails like [`DocsGenerator::generate`].
    pub fn generate_all(&self) -> Result<GenerationReport> {
        self.generate(&self.root_provider()?)
    }

    /// Generates the document from `provider` and converts it.
    ///
    /// # Errors
    ///
    /// - `DocgenError::ConfigValidation` for invalid filter patterns
    /// - `DocgenError::Scan` / `DocgenError::MalformedMetadata` from the
    ///   provider or from rendering; nothing is written in that case
    /// - `DocgenError::Write` if the document cannot be written
    /// - `DocgenError::Conversion` if the work directory cannot be created or
    ///   a requested format fails; the primary document stays in place
    pub fn generate(&self, provider: &dyn MetadataProvider) -> Result<GenerationReport> {
        self.in_scope(|| self.run(provider))
    }

    /// Renders the document text without writing anything.
    ///
    /// # Errors
    ///
    /// Fails like the scan and render steps of [`DocsGenerator::generate`].
    pub fn render_document(&self, provider: &dyn MetadataProvider) -> Result<String> {
        self.in_scope(|| {
            let components = self.discover(provider)?;
            self.render_components(&components)
        })
    }

    /// Components under the configured roots that pass the filters.
    ///
    /// # Errors
    ///
    /// Fails like the scan step of [`DocsGenerator::generate_all`].
    pub fn list_components(&self) -> Result<Vec<ComponentDescriptor>> {
        self.in_scope(|| self.discover(&self.root_provider()?))
    }

    /// Renders the block of a single component.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::MalformedMetadata` for duplicate paths, or for
    /// unknown condition targets under the strict policy.
    pub fn render_component_block(&self, descriptor: &ComponentDescriptor) -> Result<String> {
        let properties = flatten(descriptor)?;
        let resolver =
            ConditionResolver::new(&descriptor.name, &properties, self.options.condition_policy);

        let rows = properties
            .iter()
            .map(|property| {
                Ok(RenderedRow::new(
                    &property.path,
                    &property.description,
                    property.default.as_deref(),
                    resolver.render(property)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(component = %descriptor.name, rows = rows.len(), "Rendered component");
        Ok(render_component(
            descriptor,
            &rows,
            self.options.effective_heading_depth(),
        ))
    }

    fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    fn root_provider(&self) -> Result<DescriptorFileProvider> {
        if self.options.roots.is_empty() {
            return Err(DocgenError::ConfigValidation {
                field: "roots".to_string(),
                details: "at least one scan root is required".to_string(),
            });
        }
        Ok(DescriptorFileProvider::new(self.options.roots.iter().cloned()))
    }

    fn discover(&self, provider: &dyn MetadataProvider) -> Result<Vec<ComponentDescriptor>> {
        let filter = ComponentFilter::new(
            self.options.category_filter.clone(),
            &self.options.includes,
            &self.options.excludes,
        )?;

        let discovered = provider.components()?;
        let total = discovered.len();
        let components = filter.apply(discovered);

        if components.is_empty() && total > 0 {
            warn!(total, "Filters excluded every component");
        }
        debug!(total, kept = components.len(), "Discovered components");

        Ok(components)
    }

    fn render_components(&self, components: &[ComponentDescriptor]) -> Result<String> {
        let blocks = components
            .iter()
            .map(|component| self.render_component_block(component))
            .collect::<Result<Vec<_>>>()?;

        Ok(assemble(&blocks))
    }

    #[instrument(skip_all, fields(output = %self.options.output_path.display()))]
    fn run(&self, provider: &dyn MetadataProvider) -> Result<GenerationReport> {
        let components = self.discover(provider)?;
        let document = self.render_components(&components)?;

        let output = &self.options.output_path;
        write_atomically(output, document.as_bytes())
            .map_err(|e| DocgenError::write(e, output))?;
        info!(
            components = components.len(),
            path = %output.display(),
            "Generated documentation"
        );

        let conversions = self.convert_outputs()?;

        Ok(GenerationReport {
            document: output.clone(),
            components: components.into_iter().map(|c| c.name).collect(),
            conversions,
        })
    }

    fn convert_outputs(&self) -> Result<Vec<(String, PathBuf)>> {
        if self.options.format_outputs.is_empty() {
            return Ok(Vec::new());
        }

        let work_dir = self.options.effective_work_dir();
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| DocgenError::conversion(e, WORK_DIR_LABEL, &work_dir))?;

        let mut conversions = Vec::with_capacity(self.options.format_outputs.len());
        for (format, target) in &self.options.format_outputs {
            let request = ConversionRequest {
                format,
                source: &self.options.output_path,
                target,
                title: self.options.title.as_deref(),
                version: self.options.version.as_deref(),
                work_dir: &work_dir,
            };
            self.converters.convert(&request)?;
            conversions.push((format.clone(), target.clone()));
        }

        Ok(conversions)
    }
}
