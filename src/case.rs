//! Test classes and their registration.
//!
//! A test class is any `Default` type implementing `TestCase`. Its test
//! methods are listed explicitly with `method!`, and the class itself is made
//! known to the runner either by adding it to a `Registry` or by submitting it
//! to the global collection with `register!`.

use crate::context::Context;
use crate::exception::Outcome;
use crate::model::MethodInfo;
use crate::provider::Providers;
use crate::Result;

use regex::Regex;

lazy_static! {
    static ref EXPECT_ANNOTATION: Regex = Regex::new(r"@expect\s+([\w:]+)").unwrap();
}

/// The capabilities every test class provides.
#[allow(unused_variables)]
pub trait TestCase: Default + 'static {
    /// The public operations of the class. Only those matching the test filter are run.
    fn methods() -> Vec<TestMethod<Self>>;

    /// Prepares the fixture. Runs before every test method.
    fn set_up(&mut self, t: &mut Context) -> Outcome { Ok(()) }

    /// Cleans up the fixture. Runs after every test method, even failed ones.
    fn tear_down(&mut self, t: &mut Context) -> Outcome { Ok(()) }

    /// Registers assertion providers for this instance.
    fn providers(&self, providers: &mut Providers) -> Result<()> { Ok(()) }
}

/// The body of a test method.
pub type MethodBody<T> = fn(&mut T, &mut Context) -> Outcome;

/// A public operation of a test class.
pub struct TestMethod<T> {
    pub name: &'static str,
    /// Where the method was listed.
    pub file: &'static str,
    pub line: u32,
    /// Declared expected exception kinds.
    pub expectations: Vec<String>,
    pub body: MethodBody<T>,
}

/// A registered test class.
///
/// This is a plain, copyable description; instances are created on demand
/// when the class is run.
#[derive(Copy, Clone, Debug)]
pub struct TestClass {
    pub name: &'static str,
    /// The source file defining the class, as given by `file!()`.
    pub file: &'static str,
    describe: fn() -> Vec<MethodInfo>,
    instantiate: fn() -> Box<dyn Instance>,
}

inventory::collect!(TestClass);

/// An explicit list of test classes.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    classes: Vec<TestClass>,
}

/// A type-erased, instantiated test class.
pub(crate) trait Instance {
    fn providers(&self, providers: &mut Providers) -> Result<()>;

    fn set_up(&mut self, t: &mut Context) -> Outcome;

    fn tear_down(&mut self, t: &mut Context) -> Outcome;

    /// Runs the named method, returning `None` if there is no such method.
    fn run(&mut self, method: &str, t: &mut Context) -> Option<Outcome>;
}

struct Fixture<T> {
    instance: T,
    methods: Vec<TestMethod<T>>,
}

impl<T> TestMethod<T> {
    pub fn new(name: &'static str, file: &'static str, line: u32, body: MethodBody<T>) -> Self {
        TestMethod { name, file, line, expectations: Vec::new(), body }
    }

    /// Declares that the method is expected to raise an exception of the given kind.
    pub fn expect<S>(mut self, kind: S) -> Self
        where S: Into<String> {
        self.expectations.push(kind.into());
        self
    }

    /// Reads `@expect <Kind>` declarations from documentation text.
    pub fn doc(mut self, text: &str) -> Self {
        for captures in EXPECT_ANNOTATION.captures_iter(text) {
            self.expectations.push(captures[1].to_owned());
        }
        self
    }

    pub fn info(&self) -> MethodInfo {
        MethodInfo {
            name: self.name,
            file: self.file,
            line: self.line,
            expectations: self.expectations.clone(),
        }
    }
}

impl TestClass {
    pub const fn new<T>(name: &'static str, file: &'static str) -> Self
        where T: TestCase {
        TestClass { name, file, describe: describe::<T>, instantiate: instantiate::<T> }
    }

    /// The test methods of the class, without instantiating it.
    pub fn methods(&self) -> Vec<MethodInfo> {
        (self.describe)()
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Instance> {
        (self.instantiate)()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Every class submitted with `register!`, ordered by file and name.
    pub fn collected() -> Self {
        let mut classes: Vec<TestClass> = inventory::iter::<TestClass>.into_iter().cloned().collect();
        classes.sort_by(|a, b| (a.file, a.name).cmp(&(b.file, b.name)));

        debug!("collected {} registered test classes", classes.len());
        Registry { classes }
    }

    pub fn add(&mut self, class: TestClass) -> &mut Self {
        self.classes.push(class);
        self
    }

    pub fn with(mut self, class: TestClass) -> Self {
        self.add(class);
        self
    }

    pub fn classes(&self) -> &[TestClass] {
        &self.classes
    }
}

impl<T> Instance for Fixture<T> where T: TestCase {
    fn providers(&self, providers: &mut Providers) -> Result<()> {
        self.instance.providers(providers)
    }

    fn set_up(&mut self, t: &mut Context) -> Outcome {
        self.instance.set_up(t)
    }

    fn tear_down(&mut self, t: &mut Context) -> Outcome {
        self.instance.tear_down(t)
    }

    fn run(&mut self, method: &str, t: &mut Context) -> Option<Outcome> {
        let body = self.methods.iter().find(|m| m.name == method)?.body;
        Some(body(&mut self.instance, t))
    }
}

fn describe<T>() -> Vec<MethodInfo> where T: TestCase {
    T::methods().iter().map(TestMethod::info).collect()
}

fn instantiate<T>() -> Box<dyn Instance> where T: TestCase {
    Box::new(Fixture { instance: T::default(), methods: T::methods() })
}

/// Lists a test method inside `TestCase::methods`.
///
/// ```ignore
/// fn methods() -> Vec<TestMethod<Self>> {
///     vec![method!(dummy_test), method!(throws_test).expect("InvalidArgument")]
/// }
/// ```
#[macro_export]
macro_rules! method {
    ($name:ident) => {
        $crate::TestMethod::new(stringify!($name), file!(), line!(), Self::$name)
    };
}

/// Describes a test class for a `Registry`.
#[macro_export]
macro_rules! class {
    ($ty:ty) => {
        $crate::TestClass::new::<$ty>(stringify!($ty), file!())
    };
}

/// Submits a test class to the global collection read by `Registry::collected`.
#[macro_export]
macro_rules! register {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::class!($ty)
        }
    };
}
