use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Runtime type tag of a dragged value.
///
/// Two tags are equal iff they describe the same Rust type; the name is only kept for debugging.
#[derive(Clone, Copy)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
}

impl PayloadType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl Hash for PayloadType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Provider<T> = Rc<dyn Fn() -> Option<T>>;
type Upcast<T> = Rc<dyn Fn(T) -> Box<dyn Any>>;

/// The value carried by a drag target.
///
/// The provider is invoked on every read, so a drop zone always sees the value the drag target
/// currently exposes rather than the one it had when the drag started.
///
/// Rust has no subtyping, so "a zone that accepts `Animal` also accepts a `Cat`" is expressed with
/// [`Self::accepting_as`], which registers an explicit conversion.
pub struct DataToDrop<T> {
    provider: Provider<T>,
    supertypes: Vec<(PayloadType, Upcast<T>)>,
}

impl<T: 'static> DataToDrop<T> {
    pub fn new(provider: impl Fn() -> Option<T> + 'static) -> Self {
        Self {
            provider: Rc::new(provider),
            supertypes: Vec::new(),
        }
    }

    pub fn from_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || Some(value.clone()))
    }

    /// Make this payload acceptable to zones declared for `S`, converting with `upcast`.
    pub fn accepting_as<S: 'static>(mut self, upcast: impl Fn(T) -> S + 'static) -> Self {
        let ty = PayloadType::of::<S>();
        self.supertypes.retain(|(existing, _)| *existing != ty);
        self.supertypes
            .push((ty, Rc::new(move |value: T| Box::new(upcast(value)) as Box<dyn Any>)));
        self
    }

    pub fn payload_type(&self) -> PayloadType {
        PayloadType::of::<T>()
    }

    pub fn data(&self) -> Option<T> {
        (self.provider)()
    }

    /// Is a zone declared for `ty` allowed to receive this payload?
    pub fn is_assignable_to(&self, ty: PayloadType) -> bool {
        ty == self.payload_type() || self.supertypes.iter().any(|(s, _)| *s == ty)
    }

    pub fn data_as<S: 'static>(&self) -> Option<S> {
        downcast(self.data_any(PayloadType::of::<S>())?)
    }

    fn data_any(&self, ty: PayloadType) -> Option<Box<dyn Any>> {
        if ty == self.payload_type() {
            return self.data().map(|value| Box::new(value) as Box<dyn Any>);
        }
        let (_, upcast) = self.supertypes.iter().find(|(s, _)| *s == ty)?;
        self.data().map(&**upcast)
    }

    pub fn erased(self) -> AnyDataToDrop {
        AnyDataToDrop {
            inner: Rc::new(self),
        }
    }
}

impl<T: 'static> fmt::Debug for DataToDrop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataToDrop")
            .field("type", &self.payload_type())
            .field(
                "supertypes",
                &self.supertypes.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn downcast<S: 'static>(value: Box<dyn Any>) -> Option<S> {
    value.downcast::<S>().ok().map(|value| *value)
}

trait ErasedData {
    fn payload_type(&self) -> PayloadType;
    fn is_assignable_to(&self, ty: PayloadType) -> bool;
    fn data_any(&self, ty: PayloadType) -> Option<Box<dyn Any>>;
}

impl<T: 'static> ErasedData for DataToDrop<T> {
    fn payload_type(&self) -> PayloadType {
        Self::payload_type(self)
    }

    fn is_assignable_to(&self, ty: PayloadType) -> bool {
        Self::is_assignable_to(self, ty)
    }

    fn data_any(&self, ty: PayloadType) -> Option<Box<dyn Any>> {
        Self::data_any(self, ty)
    }
}

/// Type-erased, cheap to clone handle to a [`DataToDrop`].
///
/// This is what the session record and the drop zones see.
#[derive(Clone)]
pub struct AnyDataToDrop {
    inner: Rc<dyn ErasedData>,
}

impl AnyDataToDrop {
    pub fn new<T: 'static>(data: DataToDrop<T>) -> Self {
        data.erased()
    }

    pub fn payload_type(&self) -> PayloadType {
        self.inner.payload_type()
    }

    pub fn is_assignable_to(&self, ty: PayloadType) -> bool {
        self.inner.is_assignable_to(ty)
    }

    /// Read the current value as `S`, if the payload is assignable to `S` and the provider
    /// currently has a value.
    pub fn data_as<S: 'static>(&self) -> Option<S> {
        downcast(self.inner.data_any(PayloadType::of::<S>())?)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> From<DataToDrop<T>> for AnyDataToDrop {
    fn from(data: DataToDrop<T>) -> Self {
        data.erased()
    }
}

impl fmt::Debug for AnyDataToDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyDataToDrop")
            .field(&self.payload_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Cat(&'static str);

    #[derive(Clone, Debug, PartialEq)]
    enum Animal {
        Cat(&'static str),
    }

    #[test]
    fn provider_is_reinvoked_on_every_read() {
        let counter = Rc::new(Cell::new(0));
        let data = DataToDrop::new({
            let counter = Rc::clone(&counter);
            move || {
                counter.set(counter.get() + 1);
                Some(counter.get())
            }
        })
        .erased();

        assert_eq!(data.data_as::<i32>(), Some(1));
        assert_eq!(data.data_as::<i32>(), Some(2));
    }

    #[test]
    fn exact_type_is_assignable_and_unrelated_type_is_not() {
        let data = AnyDataToDrop::new(DataToDrop::from_value(Cat("tom")));

        assert!(data.is_assignable_to(PayloadType::of::<Cat>()));
        assert!(!data.is_assignable_to(PayloadType::of::<String>()));
        assert_eq!(data.data_as::<Cat>(), Some(Cat("tom")));
        assert_eq!(data.data_as::<String>(), None);
    }

    #[test]
    fn registered_supertype_converts_on_read() {
        let data = DataToDrop::from_value(Cat("tom"))
            .accepting_as(|Cat(name)| Animal::Cat(name))
            .erased();

        assert!(data.is_assignable_to(PayloadType::of::<Animal>()));
        assert_eq!(data.data_as::<Animal>(), Some(Animal::Cat("tom")));
    }

    #[test]
    fn empty_provider_yields_none_but_keeps_its_type() {
        let data = DataToDrop::<String>::new(|| None).erased();
        assert_eq!(data.payload_type(), PayloadType::of::<String>());
        assert!(data.data_as::<String>().is_none());
    }

    #[test]
    fn clones_share_identity() {
        let data = DataToDrop::from_value(1_u8).erased();
        let other = DataToDrop::from_value(1_u8).erased();
        assert!(data.ptr_eq(&data.clone()));
        assert!(!data.ptr_eq(&other));
    }
}
