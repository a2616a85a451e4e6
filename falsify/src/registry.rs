//! Type-keyed registry of default generators and simplifiers.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::generator::{BoxedGenerator, Generator};
use crate::primitives::{
    BoolGenerator, CharGenerator, FloatGenerator, IntGenerator, StringGenerator,
};
use crate::simplifier::{BoxedSimplifier, Simplifier};

/// Type-safe registry for storing and retrieving generators and simplifiers
///
/// Lookups happen by type, so a check can ask for "the generator for `T`"
/// without naming one. See [`crate::execution::check_for_all_registered`].
pub struct GeneratorRegistry {
    generators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    simplifiers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl GeneratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
            simplifiers: HashMap::new(),
        }
    }

    /// Create a registry holding generators and simplifiers for the
    /// primitive types: the integer types, `f32`, `f64`, `bool`, `char` and
    /// `String`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_int::<i8>();
        registry.register_int::<i16>();
        registry.register_int::<i32>();
        registry.register_int::<i64>();
        registry.register_int::<u8>();
        registry.register_int::<u16>();
        registry.register_int::<u32>();
        registry.register_int::<u64>();
        registry.register_int::<usize>();

        registry.register_fuzzer::<f32, _>(FloatGenerator::<f32>::new(-1.0e6, 1.0e6));
        registry.register_fuzzer::<f64, _>(FloatGenerator::<f64>::new(-1.0e6, 1.0e6));
        registry.register_fuzzer::<bool, _>(BoolGenerator);
        registry.register_fuzzer::<char, _>(CharGenerator);
        registry.register_fuzzer::<String, _>(StringGenerator::default());

        registry
    }

    fn register_int<T>(&mut self)
    where
        T: num_traits::PrimInt
            + rand::distributions::uniform::SampleUniform
            + Send
            + Sync
            + 'static,
    {
        self.register_fuzzer::<T, _>(IntGenerator::<T>::full_range());
    }

    fn register_fuzzer<T, F>(&mut self, fuzzer: F)
    where
        T: 'static,
        F: Generator<T> + Simplifier<T> + Clone + Send + Sync + 'static,
    {
        self.register::<T, _>(fuzzer.clone());
        self.register_simplifier::<T, _>(fuzzer);
    }

    /// Register a generator for a specific type, replacing any previous one
    pub fn register<T: 'static, G: Generator<T> + Send + Sync + 'static>(&mut self, generator: G) {
        let type_id = TypeId::of::<T>();
        self.generators
            .insert(type_id, Box::new(BoxedGenerator::new(generator)));
    }

    /// Register a simplifier for a specific type, replacing any previous one
    pub fn register_simplifier<T: 'static, S: Simplifier<T> + Send + Sync + 'static>(
        &mut self,
        simplifier: S,
    ) {
        let type_id = TypeId::of::<T>();
        self.simplifiers
            .insert(type_id, Box::new(BoxedSimplifier::new(simplifier)));
    }

    /// Get the generator for a specific type
    pub fn get<T: 'static>(&self) -> Option<&BoxedGenerator<T>> {
        let type_id = TypeId::of::<T>();
        self.generators
            .get(&type_id)
            .and_then(|boxed| boxed.downcast_ref::<BoxedGenerator<T>>())
    }

    /// Get the simplifier for a specific type
    pub fn simplifier<T: 'static>(&self) -> Option<&BoxedSimplifier<T>> {
        let type_id = TypeId::of::<T>();
        self.simplifiers
            .get(&type_id)
            .and_then(|boxed| boxed.downcast_ref::<BoxedSimplifier<T>>())
    }

    /// Check if a generator is registered for a specific type
    pub fn contains<T: 'static>(&self) -> bool {
        self.generators.contains_key(&TypeId::of::<T>())
    }

    /// Remove the generator and simplifier for a specific type
    pub fn remove<T: 'static>(&mut self) -> bool {
        let type_id = TypeId::of::<T>();
        self.simplifiers.remove(&type_id);
        self.generators.remove(&type_id).is_some()
    }

    /// Number of types with a registered generator
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generators.len())
            .field("simplifiers", &self.simplifiers.len())
            .finish()
    }
}
