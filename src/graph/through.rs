use crate::graph::node::{RenderCtx, SignalNode};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first
(source) into the second (effect). This is the fundamental building block
for chains like: noise -> lowpass -> envelope.

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Effect processes in-place (e.g., filter)
  Final output:    [0.4, 0.6, -0.2, 0.7, ...]  (filtered result)

Through vs Amplify vs Blend:
----------------------------
- Through: serial processing (source -> effect -> output)
- Amplify: multiplication (signal x modulator)
- Blend:   parallel sum (layer + layer)

  Through: [Source] --> [Effect] --> output

  Amplify: [Signal] --+--> (x) --> output
           [Mod]    --+

  Blend:   [A] -------+--> (+) --> output
           [B] -------+

Choose Through when audio flows from one processor to the next.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: SignalNode, F: SignalNode> SignalNode for Through<S, F> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render(out, ctx);
        self.effect.render(out, ctx);
    }
}
