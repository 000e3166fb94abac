//! Static copy shown by the effects.

/// Long-form essay used by the paragraph effects.
pub const TEXT_CONTENT: &str = r#"
The nature of time has puzzled philosophers and scientists for millennia. Is it a fundamental property of the universe, a dimension in which events occur in sequence, or is it merely an intellectual concept, a framework that humans use to structure and compare their experiences? 

In classical mechanics, time is absolute and passes at a constant rate for everyone, everywhere. However, Einstein's theory of relativity revolutionized this view, proposing that time is relative and interwoven with space into a four-dimensional fabric known as spacetime. Gravity can bend this fabric, causing time to dilate; clocks closer to a massive object tick slower than those further away.

Entropy, a measure of disorder, gives time its arrow. The second law of thermodynamics states that the total entropy of an isolated system can never decrease over time. This suggests a one-way direction: from order to disorder, from the past to the future. This irreversible flow creates the distinction between yesterday and tomorrow.

Memory serves as our personal connection to the passage of time. We reconstruct the past through fragments of recollection, often imperfect and colored by emotion. The future remains a realm of probability and imagination.

Quantum mechanics introduces further complexity. At the subatomic level, particles can exist in superpositions, and the linear progression of cause and effect is not always straightforward. Some theories even suggest that at the most fundamental level, time might be an illusion, an emergent property of quantum entanglement.

Ultimately, whether time is a physical reality or a mental construct, its passage defines the human condition. We are bound by its flow, observing the changes in ourselves and the world around us, marking moments before they slip away into history.

In the vast expanse of the cosmos, stars are born, live, and die over billions of years. To the universe, a human life is but a fleeting spark. Yet, in that brief interval, we strive to understand the infinite, to leave a mark, to grasp the meaning of our existence within the river of time. 

Art, literature, and science are our attempts to transcend our temporal limits. By recording our thoughts and discoveries, we communicate across generations, allowing ideas to persist long after their creators have vanished. In this way, we achieve a semblance of immortality, a defiance against the erasing power of time.

Impression Blocked Out By Time.
"#;

pub const SYNTAX_TEXT: &str = "The wind rises from the lines a partially opened box The fragments of melody come from a place we left long ago When it plays again years fold The world becomes light again light enough to be picked up once more Rising up not just notes but the years carried by the sound Freedom is sometimes simple a sentence flying up again";

pub const RIPPLE_TEXT: &str = "The surface of the mind reflects the world like water. A single thought can create ripples that distort reality. Is what we see the truth, or merely a reflection trembling in the wind?";

pub const SPORE_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.,;*~°•○";

pub const CHASM_WORDS: &[&str] = &[
    "VOID", "ABYSS", "ECHO", "DEEP", "LOST", "SELF", "TIME", "DARK", "FALL", "SINK", "GONE",
    "NULL", "ZERO", "LOOP", "END", "PAST", "HUSH", "COLD",
];

pub const NEON_CHARS: &str = "アィイゥウェエォオカガキギクグケゲコゴサザシジスズセゼソゾタダチヂッツヅテデトドナニヌネノハバパヒビピフブプヘベペホボポマミムメモャヤュユョヨラリルレロヮワヰヱヲンヴヵヶ0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const ECLIPSE_WORDS: &[&str] = &[
    "SHADOW", "LIGHT", "DARK", "UMBRA", "GLOW", "DUSK", "DAWN", "NOIR", "ECLIPSE", "SHADE",
    "OBSCURE", "REVEAL", "HIDDEN", "SILENT", "NIGHT",
];

pub const VELOCITY_WORDS: &[&str] = &[
    "FUTURE", "PAST", "NOW", "SPEED", "LIGHT", "WARP", "TIME", "FLOW", "RUSH", "FLIGHT", "GONE",
    "FAST", "ZOOM", "AHEAD",
];

pub const BLOOM_TEXT: &str = r#"In the garden of time, every moment is a seed. 
  Soft winds carry whispers of yesterday, planting memories in the soil of our minds. 
  Patience is the water, hope is the sun. 
  We wait for the seasons to turn, for the cold to pass. 
  And when the light touches us, we unfold. 
  Layers of color, hidden deep within, burst forth in a silent symphony. 
  Beauty is not in the everlasting, but in the fleeting perfection of a single bloom.
  Breathe in the fragrance of now."#;

pub const NOIR_TEXT: &str = r#"
  The city sleeps in monochrome. 
  Shadows lengthen across the pavement, telling stories of people who have passed this way before. 
  Smoke curls from a forgotten cigarette, dancing in the pale light of a streetlamp. 
  Jazz notes float through the heavy air, melancholy and sweet. 
  Everything here is a memory of something else. 
  We are all just actors in a silent film, waiting for our cue. 
  The plot is unwritten, the ending uncertain. 
  But in this moment, in this light, there is a kind of perfect stillness. 
  A pause between heartbeats. 
  A breath held in the dark.
"#;

pub const ORB_CHARS: &[&str] = &[
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga",
    "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd",
    "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os",
    "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa",
    "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
];

pub const SIGNAL_TEXT: &[&str] = &[
    "SYSTEM_FAILURE", "NO_SIGNAL", "CONNECTION_LOST", "RETRYING...", "DATA_CORRUPTION",
    "GHOST_IN_SHELL", "MEMORY_LEAK", "BUFFER_OVERFLOW", "STATIC_NOISE", "VOID_NULL",
    "404_NOT_FOUND", "ACCESS_DENIED", "DECRYPTING", "SIGNAL_INTERFERENCE", "BOOT_SEQUENCE",
    "KERNEL_PANIC",
];

pub const KINETIC_TEXT: &str = "FUTURE MOVE NOW FAST SHIFT BOLD TYPE GRID FLOW WAVE PUSH PULL ZONE CORE FLUX";

pub const VAPOR_TEXT: &str = r#"
  Rain falls like memories on the glass,
  Blurring the line between now and then.
  
  I trace your name in the condensation,
  Briefly clear, sharp against the grey sky,
  Before the mist reclaims it.
  
  We are but islands in a sea of static.
  Waiting for a break in the clouds.
  
  The city lights smear into bokeh ghosts.
  Everything ephemeral.
  Everything drifting.
  
  Look closer.
  The clarity is fleeting,
  But it was real.
"#;

pub const CHRISTMAS_TEXT: &[&str] = &[
    "JOY", "HOPE", "LOVE", "PEACE", "WARMTH", "LIGHT", "STAR", "GIFT", "SNOW", "SONG",
];

pub const GRAVITY_WORDS: &[&str] = &[
    "MASS", "FORCE", "WEIGHT", "PULL", "ORBIT", "FALL", "HEAVY", "DENSE", "CORE", "FIELD",
    "ATTR", "FLUX", "LINK", "DROP", "DOWN", "EARTH",
];

pub const THREAD_TEXT: &str = "WEB NET LINK KNOT TIE BOND LOOP WEAVE SPIN TWINE CORD ROPE SILK LINE MESH GRIP HOLD STAY";

pub const GALAXY_TEXT: &str = "STARS DUST VOID NEBULA NOVA LIGHT TIME SPACE COSMOS ORBIT GRAVITY SPIN GLOW DARK COLD LIFE";

pub const KINTSUGI_TEXT: &str = r#"
  BROKEN BUT BEAUTIFUL
  THE SCARS ARE GOLD
  HISTORY IS NOT ERASED
  IT IS CELEBRATED
  MENDED WITH LIGHT
  STRONGER THAN BEFORE
  FRAGMENTED WHOLE
"#;
