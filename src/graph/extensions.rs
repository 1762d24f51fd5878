use crate::graph::{
    amplify::Amplify,
    blend::Blend,
    modulate::Modulate,
    node::{Modulatable, SignalNode},
    through::Through,
};

pub trait NodeExt: SignalNode + Sized {
    fn amplify<M>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<F: SignalNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    fn modulate<M: SignalNode>(self, lfo: M, param: Self::Param, depth: f32) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, lfo, param, depth)
    }

    fn blend<B: SignalNode>(self, layer: B) -> Blend<Self, B> {
        Blend::new(self, layer)
    }
}

impl<T: SignalNode> NodeExt for T {}
