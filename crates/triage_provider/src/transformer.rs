/// A rewrite applied to a provider request before it is sent.
pub trait Transformer: Sized {
    type Value;

    fn transform(&mut self, value: Self::Value) -> Self::Value;

    /// Runs `self` and then `other`.
    fn pipe<B>(self, other: B) -> Pipe<Self, B>
    where
        B: Transformer<Value = Self::Value>,
    {
        Pipe(self, other)
    }
}

pub struct Pipe<A, B>(A, B);

impl<A, B> Transformer for Pipe<A, B>
where
    A: Transformer,
    B: Transformer<Value = A::Value>,
{
    type Value = A::Value;

    fn transform(&mut self, value: Self::Value) -> Self::Value {
        let value = self.0.transform(value);
        self.1.transform(value)
    }
}
